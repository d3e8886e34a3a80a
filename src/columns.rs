use super::*;

/// A personalisation value bound to a placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Value {
    /// A single string.
    Text(String),
    /// A list of items. Empty items are dropped on construction.
    List(Vec<String>),
    /// An explicit null.
    #[default]
    Null,
}

impl Value {
    /// Build a list value, dropping empty items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(
            items
                .into_iter()
                .map(Into::into)
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }

    /// Convert decoded JSON. Numbers are stringified and booleans become `True`/`False`.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Array(items) => Value::list(
                items
                    .into_iter()
                    .filter(|item| !is_falsy(item))
                    .filter_map(|item| match Value::from_json(item) {
                        Value::Text(text) => Some(text),
                        _ => None,
                    }),
            ),
            scalar => Value::Text(scalar_to_text(scalar)),
        }
    }

    /// Whether the value counts as supplied: any text, or a list with at least one item.
    pub fn is_present(&self) -> bool {
        match self {
            Value::Text(_) => true,
            Value::List(items) => !items.is_empty(),
            Value::Null => false,
        }
    }

    /// The string form used for conditional checks and inline substitution.
    ///
    /// Lists read as a phrase, so `["a", "b", "c"]` becomes `a, b and c`.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(text) => Cow::Borrowed(text),
            Value::List(items) => Cow::Owned(formatted_list(items)),
            Value::Null => Cow::Borrowed(""),
        }
    }
}

/// List items dropped on decoding: `null`, `false`, zero and empty strings.
fn is_falsy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null | serde_json::Value::Bool(false) => true,
        serde_json::Value::Number(number) => number.as_f64() == Some(0.0),
        serde_json::Value::String(text) => text.is_empty(),
        _ => false,
    }
}

fn scalar_to_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text,
        serde_json::Value::Bool(true) => "True".to_owned(),
        serde_json::Value::Bool(false) => "False".to_owned(),
        other => other.to_string(),
    }
}

/// Join items as `a`, `a and b`, or `a, b and c`.
pub(crate) fn formatted_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_owned(),
        [init @ .., last] => format!(
            "{} and {}",
            init.iter().map(AsRef::as_ref).join(", "),
            last.as_ref()
        ),
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Text(if value { "True" } else { "False" }.to_owned())
    }
}

impl<S: Into<String>> From<Vec<S>> for Value {
    fn from(items: Vec<S>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        serde_json::Value::deserialize(deserializer).map(Value::from_json)
    }
}

/// Personalisation keyed case- and separator-insensitively.
///
/// `First Name`, `first_name` and `FIRST-NAME` all address the same entry. The spelling used
/// on insertion is kept so values can be handed back under their original keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Columns {
    entries: BTreeMap<String, (String, Value)>,
}

impl Columns {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lower-case the key and drop whitespace, underscores and hyphens.
    ///
    /// ```rust
    /// # use notify_fmt::Columns;
    /// assert_eq!(Columns::make_key("Address Line_1"), "addressline1");
    /// ```
    pub fn make_key(key: &str) -> String {
        key.chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// A mapping holding `keys` with null values.
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().map(|key| (key, Value::Null)).collect()
    }

    /// Decode a JSON object. Anything other than an object is rejected.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .map(|(key, value)| (key, Value::from_json(value)))
                .collect()),
            _ => Err(Error::MalformedValues),
        }
    }

    /// Decode a JSON document holding an object.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(input)?)
    }

    /// Insert or replace the value addressed by `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        self.entries
            .insert(Self::make_key(&key), (key, value.into()));
    }

    /// Look up a value by any spelling of its key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&Self::make_key(key)).map(|(_, value)| value)
    }

    /// The value for `key` when it counts as supplied.
    pub fn get_present(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| value.is_present())
    }

    /// Whether any spelling of `key` is present, null or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&Self::make_key(key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys as they were spelled on insertion.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(key, _)| key.as_str())
    }

    /// Entries under their original spellings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .values()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Re-key entries to the spelling used in `names` where one matches.
    ///
    /// Entries with no matching name keep their own spelling.
    pub fn with_keys<'a, I>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rekeyed = self.clone();
        for name in names {
            if let Some((spelling, _)) = rekeyed.entries.get_mut(&Self::make_key(name)) {
                *spelling = name.to_owned();
            }
        }
        rekeyed
    }
}

impl<K, V> FromIterator<(K, V)> for Columns
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut columns = Columns::new();
        for (key, value) in iter {
            columns.insert(key, value);
        }
        columns
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Columns
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case_and_separators() {
        let columns = Columns::from([("Address Line 1", "1 Street")]);
        assert_eq!(columns.get("address_line_1"), Some(&Value::from("1 Street")));
        assert_eq!(columns.get("ADDRESS-LINE-1"), Some(&Value::from("1 Street")));
        assert!(columns.contains_key("addressline1"));
        assert_eq!(columns.keys().collect::<Vec<_>>(), ["Address Line 1"]);
    }

    #[test]
    fn later_spelling_wins() {
        let columns = Columns::from([("name", "a"), ("NAME", "b")]);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns.get("Name"), Some(&Value::from("b")));
    }

    #[test]
    fn rekeys_to_placeholder_spelling() {
        let columns = Columns::from([("first_name", "Jo"), ("extra", "x")]);
        let rekeyed = columns.with_keys(["First Name"]);
        assert_eq!(
            rekeyed.keys().collect::<BTreeSet<_>>(),
            BTreeSet::from(["First Name", "extra"])
        );
    }

    #[test]
    fn presence() {
        let columns = Columns::from([
            ("text", Value::from("")),
            ("list", Value::list(["", ""])),
            ("null", Value::Null),
        ]);
        assert!(columns.get_present("text").is_some());
        assert!(columns.get_present("list").is_none());
        assert!(columns.get_present("null").is_none());
        assert!(columns.get_present("absent").is_none());
    }

    #[test]
    fn decodes_json_object() {
        let columns = Columns::from_json_str(
            r#"{"name": "Jo", "count": 3, "ok": false, "items": ["a", null, "", "b"], "gone": null}"#,
        )
        .unwrap();
        assert_eq!(columns.get("name"), Some(&Value::from("Jo")));
        assert_eq!(columns.get("count"), Some(&Value::from("3")));
        assert_eq!(columns.get("ok"), Some(&Value::from("False")));
        assert_eq!(columns.get("items"), Some(&Value::list(["a", "b"])));
        assert_eq!(columns.get("gone"), Some(&Value::Null));
    }

    #[test]
    fn list_items_drop_only_falsy_json() {
        let value = Value::from_json(serde_json::json!(["False", false, 0, 1, "", null, "x"]));
        assert_eq!(value, Value::list(["False", "1", "x"]));
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(matches!(
            Columns::from_json_str(r#"["name"]"#),
            Err(Error::MalformedValues)
        ));
        assert!(matches!(
            Columns::from_json_str("{"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn list_phrases() {
        assert_eq!(formatted_list::<&str>(&[]), "");
        assert_eq!(formatted_list(&["a"]), "a");
        assert_eq!(formatted_list(&["a", "b"]), "a and b");
        assert_eq!(formatted_list(&["a", "b", "c"]), "a, b and c");
        assert_eq!(Value::list(["x", "y"]).to_text(), "x and y");
    }
}
