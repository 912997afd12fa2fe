//! Rule-based responder
//!
//! A fixed table of keyword rules mapping farmer questions to canned advice.
//! Rules are checked in table order and the first match wins, which gives the
//! category priority crops, pests, diseases, weather, schemes, market, soil,
//! and finally the generic introduction.

use serde::Serialize;

use crate::keywords::matches_any;

/// Advisory category of a matched rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Crops,
    Pests,
    Diseases,
    Weather,
    Schemes,
    Market,
    Soil,
    Generic,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Crops => "crops",
            Self::Pests => "pests",
            Self::Diseases => "diseases",
            Self::Weather => "weather",
            Self::Schemes => "schemes",
            Self::Market => "market",
            Self::Soil => "soil",
            Self::Generic => "generic",
        }
    }
}

struct Rule {
    category: Category,
    topic: &'static str,
    keywords: &'static [&'static str],
    text: &'static str,
}

const RICE: &str = "To grow rice successfully:
1. Prepare flooded paddy fields with pH 5.5-6.5
2. Use quality seeds (20-25 kg/acre), transplant 20-25 day old seedlings
3. Maintain 2-3 inches water depth during growing season
4. Apply fertilizers: Urea 50kg + DAP 25kg + Potash 15kg per acre
5. Harvest when 80% grains turn golden brown (120-150 days)
Common varieties: Samba Mahsuri, BPT-5204, MTU-1010";

const WHEAT: &str = "To grow wheat successfully:
1. Use well-drained loamy soil with pH 6.0-7.5
2. Sow in October-November, seed rate 40-50 kg/hectare
3. Row spacing 20-25 cm, irrigate 4-5 times during growth
4. Apply NPK in ratio 120:60:40 kg/ha
5. Harvest in March-April when grains are hard (moisture 12-14%)
Common varieties: HD-2967, HD-3086, PBW-343";

const CORN: &str = "About Corn: Corn needs warm weather and plenty of water. Plant after last frost. \
Requires 1-1.5 inches of water per week.";

const SUGARCANE: &str = "About Sugarcane: Sugarcane needs tropical climate with high rainfall. \
Plant in well-drained soil. Requires 1500-2000mm annual rainfall.";

const APHIDS: &str = "Regarding Aphids: Aphids can be controlled with neem oil spray or insecticidal soap. \
Check undersides of leaves regularly.";

const CATERPILLARS: &str = "Regarding Caterpillars: Use Bacillus thuringiensis (Bt) spray for caterpillar control. \
Apply in early morning or evening.";

const WHITEFLIES: &str = "Regarding Whiteflies: Yellow sticky traps and neem oil can help control whiteflies. \
Ensure good air circulation.";

const PEST_CONTROL: &str = "For pest control:
1. Identify the pest first (take photos, consult local experts)
2. Remove and destroy infected plants
3. Use neem oil spray (5ml per liter water) for minor infestations
4. Install yellow sticky traps or pheromone traps
5. Maintain field cleanliness and crop rotation
6. For severe cases, consult agricultural extension officers for appropriate pesticides";

const BLIGHT: &str = "About Blight: Blight appears as dark spots on leaves. \
Remove affected plants and avoid overhead watering.";

const RUST: &str = "About Rust: Rust shows as orange/brown spots. \
Use fungicide spray and ensure good air circulation.";

const MOSAIC: &str = "About Mosaic: Mosaic virus causes mottled leaves. \
Remove infected plants immediately to prevent spread.";

const DROUGHT: &str = "Weather advice for Drought: During drought, use drip irrigation and mulch to conserve water. \
Consider drought-resistant crop varieties.";

const FLOOD: &str = "Weather advice for Flood: In case of flooding, ensure proper drainage. \
Avoid planting in low-lying areas during monsoon.";

const FROST: &str = "Weather advice for Frost: Protect crops from frost using row covers or greenhouses. \
Plant frost-sensitive crops after last frost date.";

const SCHEMES: &str = "Major agricultural schemes:
1. PM-KISAN: ₹6000/year direct benefit transfer to farmers
2. Kisan Credit Card: Low-interest farm loans up to ₹3 lakh
3. PM Fasal Bima Yojana: Crop insurance against natural calamities
4. Soil Health Card Scheme: Free soil testing
Visit nearest Krishi Vigyan Kendra or CSC with Aadhaar, land records, and bank passbook to apply";

const MARKET: &str = "To check market prices:
1. Download eNAM app for national agricultural market prices
2. Use mKisan portal or SMS 3003 for daily prices
3. Check government MSP (Minimum Support Price) announcements
4. Sell through: Local mandis, Farmer Producer Organizations (FPOs), or directly to buyers
5. Consider grading and packaging for better prices";

const SOIL: &str = "For soil health and fertilization:
1. Get soil tested every 2-3 years (free at govt centers)
2. Use organic manure: FYM 5-10 tons/acre before planting
3. Apply chemical fertilizers based on soil test report
4. Use green manure crops (dhaincha, sunhemp) in rotation
5. Add lime if soil is acidic (pH below 5.5)
6. Practice crop rotation to maintain soil fertility";

const GENERIC: &str = "I'm AgriSaarthi, your agricultural assistant. I can help with:
- Crop cultivation techniques (rice, wheat, vegetables, etc.)
- Pest and disease management
- Government schemes and subsidies
- Market prices and selling strategies
- Soil health and fertilization
- Irrigation and water management

Please ask your specific farming question, and I'll provide detailed advice.";

// Priority order. Specific pests precede the generic pest rule.
#[rustfmt::skip]
const RULES: &[Rule] = &[
    Rule { category: Category::Crops, topic: "rice", keywords: &["rice", "paddy"], text: RICE },
    Rule { category: Category::Crops, topic: "wheat", keywords: &["wheat"], text: WHEAT },
    Rule { category: Category::Crops, topic: "corn", keywords: &["corn", "maize"], text: CORN },
    Rule { category: Category::Crops, topic: "sugarcane", keywords: &["sugarcane"], text: SUGARCANE },
    Rule { category: Category::Pests, topic: "aphids", keywords: &["aphid"], text: APHIDS },
    Rule { category: Category::Pests, topic: "caterpillars", keywords: &["caterpillar"], text: CATERPILLARS },
    Rule { category: Category::Pests, topic: "whiteflies", keywords: &["whitefl"], text: WHITEFLIES },
    Rule { category: Category::Pests, topic: "pest_control", keywords: &["pest", "insect", "bug"], text: PEST_CONTROL },
    Rule { category: Category::Diseases, topic: "blight", keywords: &["blight"], text: BLIGHT },
    Rule { category: Category::Diseases, topic: "rust", keywords: &["rust"], text: RUST },
    Rule { category: Category::Diseases, topic: "mosaic", keywords: &["mosaic"], text: MOSAIC },
    Rule { category: Category::Weather, topic: "drought", keywords: &["drought"], text: DROUGHT },
    Rule { category: Category::Weather, topic: "flood", keywords: &["flood"], text: FLOOD },
    Rule { category: Category::Weather, topic: "frost", keywords: &["frost"], text: FROST },
    Rule { category: Category::Schemes, topic: "schemes", keywords: &["scheme", "government", "subsidy"], text: SCHEMES },
    Rule { category: Category::Market, topic: "market", keywords: &["price", "market", "sell", "msp"], text: MARKET },
    Rule { category: Category::Soil, topic: "soil", keywords: &["fertilizer", "fertiliser", "soil", "nutrient"], text: SOIL },
];

/// Result of matching a query against the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    pub category: Category,
    pub topic: &'static str,
    pub text: &'static str,
}

/// Keyword-table responder used when every generative backend is exhausted
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedResponder;

impl RuleBasedResponder {
    pub fn new() -> Self {
        Self
    }

    /// Match `query` and return the single winning rule
    pub fn advise(&self, query: &str) -> Advice {
        let lowered = query.to_lowercase();

        let advice = RULES
            .iter()
            .find(|rule| matches_any(&lowered, rule.keywords))
            .map(|rule| Advice {
                category: rule.category,
                topic: rule.topic,
                text: rule.text,
            })
            .unwrap_or(Advice {
                category: Category::Generic,
                topic: "generic",
                text: GENERIC,
            });

        tracing::debug!(
            category = advice.category.as_str(),
            topic = advice.topic,
            "Rule-based advisory selected"
        );

        advice
    }

    /// Canned advisory text for `query`; never empty
    pub fn respond(&self, query: &str) -> &'static str {
        self.advise(query).text
    }

    pub fn category(&self, query: &str) -> Category {
        self.advise(query).category
    }
}
