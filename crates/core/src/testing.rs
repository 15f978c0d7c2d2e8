//! Builders for small in-memory profiles used by unit tests.

use std::collections::HashMap;

use pprof_tree_protocol::pprof::{Function, Line, Location, Profile, Sample, ValueType};

/// Builds a profile where every frame name gets its own function (file
/// `<name>.go`) and every (name, line) pair its own location.
pub(crate) struct ProfileBuilder {
    profile: Profile,
    strings: HashMap<String, i64>,
    functions: HashMap<String, u64>,
    locations: HashMap<(String, i64), u64>,
}

impl ProfileBuilder {
    /// `period_type` is the period type name, e.g. `"cpu"` or `"space"`.
    pub(crate) fn new(period_type: &str, sample_types: &[&str]) -> Self {
        let mut builder = Self {
            profile: Profile::default(),
            strings: HashMap::new(),
            functions: HashMap::new(),
            locations: HashMap::new(),
        };
        builder.intern("");
        let period = builder.intern(period_type);
        builder.profile.period_type = Some(ValueType {
            r#type: period,
            unit: 0,
        });
        for name in sample_types {
            let r#type = builder.intern(name);
            builder.profile.sample_type.push(ValueType { r#type, unit: 0 });
        }
        builder
    }

    pub(crate) fn cpu() -> Self {
        Self::new("cpu", &["samples", "cpu"])
    }

    pub(crate) fn heap() -> Self {
        Self::new(
            "space",
            &["alloc_objects", "alloc_space", "inuse_objects", "inuse_space"],
        )
    }

    fn intern(&mut self, s: &str) -> i64 {
        if let Some(&i) = self.strings.get(s) {
            return i;
        }
        let i = self.profile.string_table.len() as i64;
        self.profile.string_table.push(s.to_string());
        self.strings.insert(s.to_string(), i);
        i
    }

    fn function(&mut self, name: &str) -> u64 {
        if let Some(&id) = self.functions.get(name) {
            return id;
        }
        let id = self.functions.len() as u64 + 1;
        let name_index = self.intern(name);
        let file_index = self.intern(&format!("{name}.go"));
        self.profile.function.push(Function {
            id,
            name: name_index,
            filename: file_index,
            ..Default::default()
        });
        self.functions.insert(name.to_string(), id);
        id
    }

    fn location(&mut self, name: &str, line: i64) -> u64 {
        let key = (name.to_string(), line);
        if let Some(&id) = self.locations.get(&key) {
            return id;
        }
        let id = self.locations.len() as u64 + 1;
        let function_id = self.function(name);
        self.profile.location.push(Location {
            id,
            line: vec![Line { function_id, line }],
            ..Default::default()
        });
        self.locations.insert(key, id);
        id
    }

    /// Add a sample; `stack` is root first, the way it reads in a tree. Every
    /// frame sits on line 1.
    pub(crate) fn sample(self, stack: &[&str], values: &[i64]) -> Self {
        let stack: Vec<(&str, i64)> = stack.iter().map(|&name| (name, 1)).collect();
        self.sample_at(&stack, values)
    }

    /// Like [`Self::sample`], with an explicit line per frame.
    pub(crate) fn sample_at(mut self, stack: &[(&str, i64)], values: &[i64]) -> Self {
        let mut location_id: Vec<u64> = stack
            .iter()
            .map(|&(name, line)| self.location(name, line))
            .collect();
        location_id.reverse();
        self.profile.sample.push(Sample {
            location_id,
            value: values.to_vec(),
        });
        self
    }

    pub(crate) fn build(self) -> Profile {
        self.profile
    }
}

/// Extract `profile` in its default mode, failing the test on error.
pub(crate) fn extract_default(profile: &Profile) -> crate::model::ProfileSamples {
    let symbols = crate::symbols::SymbolTable::resolve(profile);
    crate::extract::extract_samples(profile, &symbols, crate::model::MeasurementMode::Default)
        .expect("default mode should extract")
}
