use super::RiskTier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Malignancy {
    Benign,
    Potential,
    Malignant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Routine,
    Priority,
    Urgent,
}

#[derive(Debug, Clone, Copy)]
pub struct LesionInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub full_name: &'static str,
    pub malignancy: Malignancy,
    pub severity: RiskTier,
    pub urgency: Urgency,
    pub description: &'static str,
}

pub const LESION_CATALOG: [LesionInfo; 8] = [
    LesionInfo {
        code: "nv",
        name: "Melanocytic Nevus",
        full_name: "Nevus melanocítico",
        malignancy: Malignancy::Benign,
        severity: RiskTier::Low,
        urgency: Urgency::Routine,
        description: "Lunares comunes, no cancerosos.",
    },
    LesionInfo {
        code: "mel",
        name: "Melanoma",
        full_name: "Melanoma",
        malignancy: Malignancy::Malignant,
        severity: RiskTier::High,
        urgency: Urgency::Urgent,
        description: "Cáncer de piel más agresivo; se origina en los melanocitos.",
    },
    LesionInfo {
        code: "bkl",
        name: "Benign Keratosis-like Lesion",
        full_name: "Lesiones tipo queratosis benigna",
        malignancy: Malignancy::Benign,
        severity: RiskTier::Low,
        urgency: Urgency::Routine,
        description: "Lesiones similares a queratosis seborreica o lentigo benigno.",
    },
    LesionInfo {
        code: "bcc",
        name: "Basal Cell Carcinoma",
        full_name: "Carcinoma basocelular",
        malignancy: Malignancy::Malignant,
        severity: RiskTier::High,
        urgency: Urgency::Priority,
        description: "Cáncer de piel más común; crecimiento lento pero invasivo.",
    },
    LesionInfo {
        code: "akiec",
        name: "Actinic Keratosis / Intraepithelial Carcinoma",
        full_name: "Queratosis actínica / Carcinoma intraepitelial",
        malignancy: Malignancy::Potential,
        severity: RiskTier::Medium,
        urgency: Urgency::Priority,
        description: "Lesión precancerosa que puede transformarse en carcinoma escamoso.",
    },
    LesionInfo {
        code: "vasc",
        name: "Vascular Lesion",
        full_name: "Lesión vascular",
        malignancy: Malignancy::Benign,
        severity: RiskTier::Low,
        urgency: Urgency::Routine,
        description: "Manchas vasculares o angiomas, no cancerosos.",
    },
    LesionInfo {
        code: "df",
        name: "Dermatofibroma",
        full_name: "Dermatofibroma",
        malignancy: Malignancy::Benign,
        severity: RiskTier::Low,
        urgency: Urgency::Routine,
        description: "Pequeño nódulo cutáneo benigno de origen fibroso.",
    },
    LesionInfo {
        code: "scc",
        name: "Squamous Cell Carcinoma",
        full_name: "Carcinoma de Células Escamosas",
        malignancy: Malignancy::Malignant,
        severity: RiskTier::High,
        urgency: Urgency::Urgent,
        description: "Segundo cáncer de piel más común; puede hacer metástasis.",
    },
];

pub fn lesion_info(code: &str) -> Option<&'static LesionInfo> {
    LESION_CATALOG
        .iter()
        .find(|info| info.code.eq_ignore_ascii_case(code))
}
