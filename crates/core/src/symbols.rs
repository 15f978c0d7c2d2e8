use std::collections::HashMap;

use log::{debug, warn};
use pprof_tree_protocol::{SharedStr, pprof};

use crate::model::{Function, INLINED_PREFIX};

/// Lookup tables resolved from a profile's flat, index-based arrays.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    strings: Vec<SharedStr>,
    empty: SharedStr,
    /// Function id → function. `line_number` holds the line of the last
    /// non-inlined occurrence seen, 0 if there was none.
    functions: HashMap<u64, Function>,
    /// Location id → frames, outermost (real) frame first.
    locations: HashMap<u64, Vec<Function>>,
}

impl SymbolTable {
    pub fn resolve(profile: &pprof::Profile) -> Self {
        let mut table = Self {
            strings: profile
                .string_table
                .iter()
                .map(|s| SharedStr::from(s.as_str()))
                .collect(),
            ..Default::default()
        };

        table.functions = profile
            .function
            .iter()
            .map(|f| {
                let function = Function::new(table.string(f.name), table.string(f.filename), 0);
                (f.id, function)
            })
            .collect();

        for location in &profile.location {
            if let Some(frames) = table.resolve_location(location) {
                table.locations.insert(location.id, frames);
            }
        }

        debug!(
            "resolved {} strings, {} functions, {} of {} locations",
            table.strings.len(),
            table.functions.len(),
            table.locations.len(),
            profile.location.len()
        );
        table
    }

    /// String at `index`, or the empty string when the index is out of range.
    pub fn string(&self, index: i64) -> SharedStr {
        match usize::try_from(index).ok().and_then(|i| self.strings.get(i)) {
            Some(s) => s.clone(),
            None => {
                debug!(
                    "string index {index} out of range ({} entries)",
                    self.strings.len()
                );
                self.empty.clone()
            }
        }
    }

    pub fn function(&self, id: u64) -> Option<&Function> {
        self.functions.get(&id)
    }

    /// Frames of a location, outermost first. `None` for unknown or skipped
    /// locations.
    pub fn location(&self, id: u64) -> Option<&[Function]> {
        self.locations.get(&id).map(Vec::as_slice)
    }

    fn resolve_location(&mut self, location: &pprof::Location) -> Option<Vec<Function>> {
        if location.line.first().is_none_or(|l| l.function_id == 0) {
            debug!("location {} has no usable line, skipping", location.id);
            return None;
        }
        if location.line.len() > 1 {
            warn!(
                "location {} has {} lines, expanding inlined frames",
                location.id,
                location.line.len()
            );
        }

        // The last line is the frame the others were inlined into.
        let real = location.line.len() - 1;
        let mut frames = Vec::with_capacity(location.line.len());
        for (i, line) in location.line.iter().enumerate().rev() {
            let line_number = u64::try_from(line.line).unwrap_or(0);
            let base = match self.functions.get(&line.function_id) {
                Some(f) => f.clone(),
                None => {
                    debug!(
                        "location {} references unknown function {}",
                        location.id, line.function_id
                    );
                    Function::new(self.empty.clone(), self.empty.clone(), 0)
                }
            };

            if i == real {
                // A function id can be inlined at many call sites; only its
                // real occurrence defines the canonical line.
                if let Some(canonical) = self.functions.get_mut(&line.function_id) {
                    canonical.line_number = line_number;
                }
                frames.push(Function {
                    line_number,
                    ..base
                });
            } else {
                frames.push(Function {
                    name: SharedStr::from(format!("{INLINED_PREFIX}{}", base.name)),
                    line_number,
                    inlined: true,
                    ..base
                });
            }
        }
        Some(frames)
    }
}
