use serde::{Deserialize, Serialize};

/// Severity taxonomy shared by every analyzer
///
/// Variants are declared in report order; `Severity::ALL` iterates them the
/// same way so summaries and breakdowns are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Optimization,
    #[serde(alias = "info")]
    Informational,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Optimization,
        Severity::Informational,
        Severity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Optimization => "optimization",
            Severity::Informational => "informational",
            Severity::Error => "error",
        }
    }

    /// Human label used in reports ("High", "Informational", ...)
    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Optimization => "Optimization",
            Severity::Informational => "Informational",
            Severity::Error => "Error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Severity::High),
            "medium" | "med" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "optimization" | "gas" => Some(Severity::Optimization),
            "informational" | "info" => Some(Severity::Informational),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Informational
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_aliases() {
        assert_eq!(Severity::from_str("HIGH"), Some(Severity::High));
        assert_eq!(Severity::from_str(" info "), Some(Severity::Informational));
        assert_eq!(Severity::from_str("gas"), Some(Severity::Optimization));
        assert_eq!(Severity::from_str("critical"), None);
    }

    #[test]
    fn test_all_is_report_order() {
        let labels: Vec<_> = Severity::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(
            labels,
            vec!["High", "Medium", "Low", "Optimization", "Informational", "Error"]
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Optimization).unwrap();
        assert_eq!(json, "\"optimization\"");
        let parsed: Severity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(parsed, Severity::Informational);
    }
}
