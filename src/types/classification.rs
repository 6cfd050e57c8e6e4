//! Per-turn classification produced by the external classifier

use serde::{Deserialize, Serialize};

/// Emotion tag detected in the user's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Anger,
    Shame,
    Fear,
    Frustration,
    Confusion,
    Elevation,
    MissionDrive,
    CreativeFulfillment,
    RelationalDependency,
    IsolationSignal,
}

impl Emotion {
    /// Emotions that make a short message a silence candidate
    pub fn is_high_intensity(&self) -> bool {
        matches!(
            self,
            Emotion::Fear | Emotion::Shame | Emotion::Anger | Emotion::Frustration
        )
    }

    /// Parse a classifier label; unknown labels yield None
    pub fn from_label(label: &str) -> Option<Self> {
        let emotion = match label.trim().to_ascii_lowercase().as_str() {
            "anger" => Emotion::Anger,
            "shame" => Emotion::Shame,
            "fear" => Emotion::Fear,
            "frustration" => Emotion::Frustration,
            "confusion" => Emotion::Confusion,
            "elevation" => Emotion::Elevation,
            "mission_drive" => Emotion::MissionDrive,
            "creative_fulfillment" => Emotion::CreativeFulfillment,
            "relational_dependency" => Emotion::RelationalDependency,
            "isolation_signal" => Emotion::IsolationSignal,
            _ => return None,
        };
        Some(emotion)
    }
}

/// Maturity risk level of the user's message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Product role of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Leader,
    Doctor,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Leader => "leader",
            Role::Doctor => "doctor",
            Role::Staff => "staff",
        }
    }
}

/// What the user is trying to do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    DebugProduct,
    ShareStory,
    SeekAdvice,
    Venting,
    Conflict,
    Money,
    Clinical,
    Relationship,
    LeadershipReflection,
    Other,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::DebugProduct => "debug_product",
            IntentKind::ShareStory => "share_story",
            IntentKind::SeekAdvice => "seek_advice",
            IntentKind::Venting => "venting",
            IntentKind::Conflict => "conflict",
            IntentKind::Money => "money",
            IntentKind::Clinical => "clinical",
            IntentKind::Relationship => "relationship",
            IntentKind::LeadershipReflection => "leadership_reflection",
            IntentKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEnergy {
    Low,
    Medium,
    High,
}

/// Question style the classifier suggests for the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionPreference {
    None,
    OneShortQuestion,
    OfferChoices,
}

/// Intent struct from the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent: IntentKind,
    pub user_energy: UserEnergy,
    /// Short phrase capturing the user's core meaning
    pub key_point: String,
    pub question_style: QuestionPreference,
    /// 0.0-1.0
    pub interpretation_confidence: f64,
}

impl Intent {
    /// Used when intent classification fails
    pub fn safe_default() -> Self {
        Self {
            intent: IntentKind::Other,
            user_energy: UserEnergy::Medium,
            key_point: String::new(),
            question_style: QuestionPreference::OneShortQuestion,
            interpretation_confidence: 0.5,
        }
    }
}

/// Emotion + risk pair from the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub detected_emotion: Emotion,
    pub maturity_risk_level: RiskLevel,
}

impl EmotionReading {
    /// Used when emotion classification fails
    pub fn safe_default() -> Self {
        Self {
            detected_emotion: Emotion::Confusion,
            maturity_risk_level: RiskLevel::Medium,
        }
    }
}

/// Everything the classifier contributes to one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub detected_emotion: Emotion,
    pub maturity_risk_level: RiskLevel,
    pub intent: Intent,
}

impl Classification {
    pub fn new(reading: EmotionReading, intent: Intent) -> Self {
        Self {
            detected_emotion: reading.detected_emotion,
            maturity_risk_level: reading.maturity_risk_level,
            intent,
        }
    }

    pub fn safe_default() -> Self {
        Self::new(EmotionReading::safe_default(), Intent::safe_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_defaults() {
        let c = Classification::safe_default();
        assert_eq!(c.detected_emotion, Emotion::Confusion);
        assert_eq!(c.maturity_risk_level, RiskLevel::Medium);
        assert_eq!(c.intent.intent, IntentKind::Other);
    }

    #[test]
    fn test_high_intensity_set() {
        assert!(Emotion::Fear.is_high_intensity());
        assert!(Emotion::Frustration.is_high_intensity());
        assert!(!Emotion::Confusion.is_high_intensity());
        assert!(!Emotion::Elevation.is_high_intensity());
    }

    #[test]
    fn test_labels_round_trip_through_serde_names() {
        let json = serde_json::to_string(&Emotion::MissionDrive).unwrap();
        assert_eq!(json, "\"mission_drive\"");
        assert_eq!(Emotion::from_label("Mission_Drive"), Some(Emotion::MissionDrive));
        assert_eq!(Emotion::from_label("bliss"), None);
    }
}
