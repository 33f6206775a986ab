//! Event records passed to prop handlers.

use std::fmt;

use indexmap::IndexMap;

use crate::{Colors, Value};

/// An event: the prop name it targets plus arbitrary extra fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    name: String,
    fields: IndexMap<String, Value>,
}

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Builder-style field insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Prop name the event is dispatched to (e.g. `onclick`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Flat object view: `eventName` first, then the extra fields.
    pub fn to_value(&self) -> Value {
        let mut object = Vec::with_capacity(self.fields.len() + 1);
        object.push(("eventName".to_owned(), Value::String(self.name.clone())));
        object.extend(self.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        Value::Object(object)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value().format(false, Colors::OFF))
    }
}

/// Build an event from a name and extra fields.
pub fn event<I, K, V>(name: &str, fields: I) -> Event
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    fields
        .into_iter()
        .fold(Event::new(name), |event, (k, v)| event.with(k, v))
}

pub fn click() -> Event {
    Event::new("onclick")
}

pub fn keypress(key_code: u32) -> Event {
    Event::new("onkeypress").with("keyCode", key_code)
}

pub fn keydown(key_code: u32) -> Event {
    Event::new("onkeydown").with("keyCode", key_code)
}

pub fn keyup(key_code: u32) -> Event {
    Event::new("onkeyup").with("keyCode", key_code)
}
