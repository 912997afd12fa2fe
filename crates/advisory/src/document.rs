//! Canned analysis of text extracted from farmer documents

use crate::keywords::matches_any;

const PM_KISAN: &str = "This appears to be a PM-KISAN related document. This scheme provides ₹6000 per year \
to eligible farmers. You need Aadhaar card and bank account for registration.";

const FERTILIZER_LABEL: &str = "This is a fertilizer label. I can help you understand the NPK ratio \
and application instructions for your crops.";

const SOIL_REPORT: &str = "This appears to be a soil test report. I can help you interpret the soil \
nutrient levels and recommend appropriate fertilizers.";

const GENERIC_DOCUMENT: &str = "I've analyzed your document. This appears to be an agricultural document. \
I can help you understand the key information and next steps.";

/// Classify extracted document text; the result is in English
pub fn analyze(extracted_text: &str) -> &'static str {
    let lowered = extracted_text.to_lowercase();

    if matches_any(&lowered, &["pm-kisan", "kisan"]) {
        PM_KISAN
    } else if matches_any(&lowered, &["fertilizer", "उर्वरक"]) {
        FERTILIZER_LABEL
    } else if matches_any(&lowered, &["soil", "मिट्टी"]) {
        SOIL_REPORT
    } else {
        GENERIC_DOCUMENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pm_kisan() {
        assert_eq!(analyze("PM-KISAN Samman Nidhi beneficiary"), PM_KISAN);
        assert_eq!(analyze("Kisan credit"), PM_KISAN);
    }

    #[test]
    fn test_fertilizer_label_hindi() {
        assert_eq!(analyze("यूरिया उर्वरक 45 किलो"), FERTILIZER_LABEL);
    }

    #[test]
    fn test_soil_report() {
        assert_eq!(analyze("Soil Health Card: pH 6.5"), SOIL_REPORT);
    }

    #[test]
    fn test_generic() {
        assert_eq!(analyze("Invoice #123"), GENERIC_DOCUMENT);
        assert_eq!(analyze(""), GENERIC_DOCUMENT);
    }
}
