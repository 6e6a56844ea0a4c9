use zethus_core::{StartupSeed, PARAM_CONFIG, PARAM_SESSION};

/// The URL parameters the app understands. Empty values count as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub config: Option<String>,
    pub session: Option<String>,
}

impl QueryParams {
    /// Build from decoded `(name, value)` pairs; a repeated name keeps its
    /// last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut out = Self::default();
        for (k, v) in pairs {
            let v: String = v.into();
            let slot = match k.as_ref() {
                PARAM_CONFIG => &mut out.config,
                PARAM_SESSION => &mut out.session,
                _ => continue,
            };
            *slot = (!v.is_empty()).then_some(v);
        }
        out
    }

    /// Split into the store seed and the embedding session.
    pub fn into_seed(self, provided: Option<zethus_core::Configuration>) -> (StartupSeed, Option<String>) {
        (
            StartupSeed {
                provided,
                url_config: self.config,
            },
            self.session,
        )
    }
}
