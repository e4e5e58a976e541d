pub mod number {
    use core::fmt;

    use serde::{
        de::{self, Unexpected, Visitor},
        Deserializer,
    };

    /// Accepts a JSON number or a string holding one, `null` and absence map
    /// to `None`. Use together with `#[serde(default)]`.
    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NumberVisitor;

        impl<'de> Visitor<'de> for NumberVisitor {
            type Value = Option<f64>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or a numeric string")
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                deserializer.deserialize_any(self)
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Some(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Some(value as f64))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Some(value as f64))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value
                    .trim()
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| de::Error::invalid_value(Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_option(NumberVisitor)
    }
}

pub mod lenient {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer};

    /// Parses an optional text value, treating anything that does not parse
    /// as absent. Meant for query parameters. Use together with
    /// `#[serde(default)]`.
    pub fn deserialize_option<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .and_then(|value| value.trim().parse().ok()))
    }
}
