//! The model catalogue for GPT definitions.
//!
//! A single source of truth for the three names every model has:
//!
//! - the **label** shown in forms and carried on the wire (`gpt-4o-mini`)
//! - the **stored** token persisted in the `gpt.model` column (`gpt_40_mini`)
//! - the **backend** identifier the assistant backend understands
//!
//! All lookups are total: every variant maps in both directions, and
//! `backend_model` never returns an unknown identifier.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a label or stored token names no known model.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown model: {0}")]
pub struct UnknownModel(pub String);

/// A language model selectable for a GPT definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelId {
    Gpt4oMini,
    Gpt4o,
    Gpt4,
    Gpt5,
    Gpt35,
    GeminiFlash25,
    Gemini25Pro,
    Llama38b,
    Llama4Scout,
}

impl ModelId {
    /// Every known model, in display order.
    pub const ALL: &'static [Self] = &[
        Self::Gpt4oMini,
        Self::Gpt4o,
        Self::Gpt4,
        Self::Gpt5,
        Self::Gpt35,
        Self::GeminiFlash25,
        Self::Gemini25Pro,
        Self::Llama38b,
        Self::Llama4Scout,
    ];

    /// The human-facing label used in forms and API payloads.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt-4o-mini",
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4 => "gpt-4",
            Self::Gpt5 => "gpt-5",
            Self::Gpt35 => "gpt-3.5",
            Self::GeminiFlash25 => "Gemini-flash-2.5",
            Self::Gemini25Pro => "Gemini-2.5-pro",
            Self::Llama38b => "llama3-8b-8192",
            Self::Llama4Scout => "Llama-4-Scout",
        }
    }

    /// The token persisted in the `gpt.model` column.
    #[must_use]
    pub const fn stored(self) -> &'static str {
        match self {
            Self::Gpt4oMini => "gpt_40_mini",
            Self::Gpt4o => "gpt_4o",
            Self::Gpt4 => "gpt_4",
            Self::Gpt5 => "gpt_5",
            Self::Gpt35 => "gpt_35",
            Self::GeminiFlash25 => "Gemini_flash_25",
            Self::Gemini25Pro => "Gemini_25_pro",
            Self::Llama38b => "llama3_8b_8192",
            Self::Llama4Scout => "Llama_4_Scout",
        }
    }

    /// The identifier sent to the assistant backend at session
    /// configuration time.
    ///
    /// The backend serves a fixed set of OpenAI models; anything outside
    /// that set is served as `gpt-4o-mini`.
    #[must_use]
    pub const fn backend_model(self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4 => "gpt-4",
            Self::Gpt5 => "gpt-5",
            Self::Gpt4oMini
            | Self::Gpt35
            | Self::GeminiFlash25
            | Self::Gemini25Pro
            | Self::Llama38b
            | Self::Llama4Scout => "gpt-4o-mini",
        }
    }

    /// Look up a model by its human-facing label.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownModel`] if the label names no known model.
    pub fn from_label(label: &str) -> Result<Self, UnknownModel> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.label() == label)
            .ok_or_else(|| UnknownModel(label.to_owned()))
    }

    /// Look up a model by its stored database token.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownModel`] if the token names no known model.
    pub fn from_stored(token: &str) -> Result<Self, UnknownModel> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.stored() == token)
            .ok_or_else(|| UnknownModel(token.to_owned()))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for ModelId {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s)
    }
}

// Serialized as the human-facing label on the wire.
impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_label(&s).map_err(serde::de::Error::custom)
    }
}

// Persisted as the stored token (TEXT column).
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ModelId {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ModelId {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::from_stored(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ModelId {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.stored(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip_is_total() {
        for model in ModelId::ALL {
            assert_eq!(ModelId::from_label(model.label()).unwrap(), *model);
        }
    }

    #[test]
    fn test_stored_roundtrip_is_total() {
        for model in ModelId::ALL {
            assert_eq!(ModelId::from_stored(model.stored()).unwrap(), *model);
        }
    }

    #[test]
    fn test_backend_model_is_total() {
        // Every label maps to a defined backend identifier
        for model in ModelId::ALL {
            assert!(!model.backend_model().is_empty());
        }
    }

    #[test]
    fn test_gpt_4o_mini_stored_token() {
        // Label "gpt-4o-mini" persists as "gpt_40_mini" and back
        let model = ModelId::from_label("gpt-4o-mini").unwrap();
        assert_eq!(model.stored(), "gpt_40_mini");
        assert_eq!(
            ModelId::from_stored("gpt_40_mini").unwrap().label(),
            "gpt-4o-mini"
        );
    }

    #[test]
    fn test_backend_fallback() {
        assert_eq!(ModelId::Gpt4o.backend_model(), "gpt-4o");
        assert_eq!(ModelId::Gpt5.backend_model(), "gpt-5");
        // Models the backend does not serve fall back to gpt-4o-mini
        assert_eq!(ModelId::Gemini25Pro.backend_model(), "gpt-4o-mini");
        assert_eq!(ModelId::Llama4Scout.backend_model(), "gpt-4o-mini");
    }

    #[test]
    fn test_unknown_label() {
        assert!(ModelId::from_label("gpt-7").is_err());
        assert!(ModelId::from_stored("gpt_7").is_err());
    }

    #[test]
    fn test_serde_uses_label() {
        let json = serde_json::to_string(&ModelId::Gpt4oMini).unwrap();
        assert_eq!(json, "\"gpt-4o-mini\"");
        let back: ModelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ModelId::Gpt4oMini);
    }
}
