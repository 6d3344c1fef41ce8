use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The closed set of architectures a run can select by tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    Siren,
    Mlp,
    DinerSiren,
    DinerMlp,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model type `{0}` is not implemented (expected one of Siren, MLP, DinerSiren, DinerMLP)")]
pub struct UnknownModelKind(pub String);

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Siren,
        ModelKind::Mlp,
        ModelKind::DinerSiren,
        ModelKind::DinerMlp,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ModelKind::Siren => "Siren",
            ModelKind::Mlp => "MLP",
            ModelKind::DinerSiren => "DinerSiren",
            ModelKind::DinerMlp => "DinerMLP",
        }
    }

    /// Whether the model needs a per-sample table sized from the dataset.
    pub fn uses_table(self) -> bool {
        matches!(self, ModelKind::DinerSiren | ModelKind::DinerMlp)
    }
}

impl FromStr for ModelKind {
    type Err = UnknownModelKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| UnknownModelKind(s.to_string()))
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.tag().parse::<ModelKind>(), Ok(kind));
        }
    }

    #[test]
    fn tags_are_case_sensitive() {
        assert_eq!(
            "mlp".parse::<ModelKind>(),
            Err(UnknownModelKind("mlp".into()))
        );
        assert!("Transformer".parse::<ModelKind>().is_err());
    }

    #[test]
    fn only_diner_variants_use_a_table() {
        let with_table: Vec<_> = ModelKind::ALL.into_iter().filter(|k| k.uses_table()).collect();
        assert_eq!(with_table, vec![ModelKind::DinerSiren, ModelKind::DinerMlp]);
    }
}
