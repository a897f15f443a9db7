use libsql::Value as SqlValue;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Devotion {
    pub id: i64,
    pub title: Option<String>,
    pub focus: Option<String>,
    pub verse: Option<String>,
    pub insight: Option<String>,
    #[serde(rename = "realLifeReflection")]
    pub real_life_reflection: Option<String>,
    pub prayer: Option<String>,
    pub action: Option<String>,
    pub author: Option<String>,
}

/// Body of a create request. Values are kept as raw JSON and handed to the
/// store untouched, so a number sent as `title` is stored the way the store
/// decides to store it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewDevotion {
    pub title: Option<JsonValue>,
    pub focus: Option<JsonValue>,
    pub verse: Option<JsonValue>,
    pub insight: Option<JsonValue>,
    #[serde(rename = "realLifeReflection")]
    pub real_life_reflection: Option<JsonValue>,
    pub prayer: Option<JsonValue>,
    pub action: Option<JsonValue>,
    pub author: Option<JsonValue>,
}

impl NewDevotion {
    /// Decodes a create body. A body that is not JSON-typed, is empty, or is
    /// not an object yields every field as null; only unparseable JSON fails.
    pub fn from_body(is_json: bool, body: &[u8]) -> Result<Self, serde_json::Error> {
        if !is_json || body.iter().all(u8::is_ascii_whitespace) {
            return Ok(NewDevotion::default());
        }

        match serde_json::from_slice::<JsonValue>(body)? {
            value @ JsonValue::Object(_) => serde_json::from_value(value),
            _ => Ok(NewDevotion::default()),
        }
    }

    /// Positional values in column order: title, focus, verse, insight,
    /// realLifeReflection, prayer, action, author.
    pub fn into_params(self) -> [SqlValue; 8] {
        [
            self.title,
            self.focus,
            self.verse,
            self.insight,
            self.real_life_reflection,
            self.prayer,
            self.action,
            self.author,
        ]
        .map(to_sql_value)
    }
}

pub fn to_sql_value(value: Option<JsonValue>) -> SqlValue {
    match value {
        None | Some(JsonValue::Null) => SqlValue::Null,
        Some(JsonValue::String(s)) => SqlValue::Text(s),
        Some(JsonValue::Bool(b)) => SqlValue::Integer(b as i64),
        Some(JsonValue::Number(n)) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n
                .as_f64()
                .map(SqlValue::Real)
                .unwrap_or_else(|| SqlValue::Text(n.to_string())),
        },
        Some(other) => SqlValue::Text(other.to_string()),
    }
}

/// Rows returned by a statement together with the number of rows it changed.
#[derive(Debug, Clone)]
pub struct ResultSet<T> {
    pub rows: Vec<T>,
    pub rows_affected: u64,
}

impl<T> ResultSet<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        ResultSet { rows, rows_affected: 0 }
    }

    pub fn affected(rows_affected: u64) -> Self {
        ResultSet {
            rows: vec![],
            rows_affected,
        }
    }

    pub fn first(self) -> Option<T> {
        self.rows.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_devotion_binds_eight_values() {
        let body: NewDevotion = serde_json::from_value(json!({
            "title": "Rest",
            "realLifeReflection": "Slow down",
            "unexpected": "ignored",
            "extra": 42
        }))
        .unwrap();

        let params = body.into_params();
        assert_eq!(params.len(), 8);
        assert!(matches!(&params[0], SqlValue::Text(t) if t == "Rest"));
        assert!(matches!(&params[4], SqlValue::Text(t) if t == "Slow down"));
        assert!(matches!(params[1], SqlValue::Null));
        assert!(matches!(params[7], SqlValue::Null));
    }

    #[test]
    fn test_from_body_defaults_missing_and_non_object_bodies() {
        let bodies: [(bool, &[u8]); 5] = [
            (false, br#"{"title":"x"}"#),
            (true, b""),
            (true, b"  "),
            (true, b"[]"),
            (true, b"42"),
        ];
        for (is_json, body) in bodies {
            let decoded = NewDevotion::from_body(is_json, body).unwrap();
            assert!(decoded.into_params().iter().all(|v| matches!(v, SqlValue::Null)));
        }
    }

    #[test]
    fn test_from_body_reads_object_fields() {
        let decoded = NewDevotion::from_body(true, br#"{"title":"Hope","author":null}"#).unwrap();
        assert_eq!(decoded.title, Some(json!("Hope")));
        assert_eq!(decoded.author, None);
    }

    #[test]
    fn test_from_body_rejects_malformed_json() {
        assert!(NewDevotion::from_body(true, br#"{"title":"#).is_err());
    }

    #[test]
    fn test_to_sql_value() {
        assert!(matches!(to_sql_value(None), SqlValue::Null));
        assert!(matches!(to_sql_value(Some(json!(null))), SqlValue::Null));
        assert!(matches!(to_sql_value(Some(json!(7))), SqlValue::Integer(7)));
        assert!(matches!(to_sql_value(Some(json!(1.5))), SqlValue::Real(f) if f == 1.5));
        assert!(matches!(to_sql_value(Some(json!(true))), SqlValue::Integer(1)));
        assert!(matches!(
            to_sql_value(Some(json!(["a", 1]))),
            SqlValue::Text(t) if t == r#"["a",1]"#
        ));
    }

    #[test]
    fn test_devotion_serializes_camel_case_reflection() {
        let devotion = Devotion {
            id: 3,
            real_life_reflection: Some("pause".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&devotion).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["realLifeReflection"], "pause");
        assert!(value["title"].is_null());
    }
}
