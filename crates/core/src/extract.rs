use log::{debug, trace};
use pprof_tree_protocol::pprof;

use crate::error::EngineError;
use crate::model::{MeasurementMode, ProfileKind, ProfileSamples, Sample};
use crate::symbols::SymbolTable;

/// Read the profile's kind from its period type.
pub fn profile_kind(
    profile: &pprof::Profile,
    symbols: &SymbolTable,
) -> Result<ProfileKind, EngineError> {
    let name = symbols.string(profile.period_type.map_or(0, |p| p.r#type));
    ProfileKind::from_period_type(&name)
        .ok_or_else(|| EngineError::UnsupportedProfileType(name.to_string()))
}

/// Index of the sample value column that holds `mode` for a profile of
/// `kind`. The positions are fixed by the Go runtime's profile layouts:
/// CPU profiles are `[samples, cpu]`, heap profiles are
/// `[alloc_objects, alloc_space, inuse_objects, inuse_space]`.
pub fn value_column(kind: ProfileKind, mode: MeasurementMode) -> Result<usize, EngineError> {
    match (kind, mode) {
        (_, MeasurementMode::Default)
        | (ProfileKind::Cpu, MeasurementMode::Cpu)
        | (ProfileKind::Heap, MeasurementMode::HeapAlloc) => Ok(1),
        (ProfileKind::Heap, MeasurementMode::HeapInuse) => Ok(3),
        _ => Err(EngineError::IncompatibleMode { mode, kind }),
    }
}

/// Resolve every sample of `profile` into a root-to-leaf stack carrying the
/// value selected by `mode`.
///
/// Mode and column are validated once up front; nothing is extracted when
/// they do not fit the profile.
pub fn extract_samples(
    profile: &pprof::Profile,
    symbols: &SymbolTable,
    mode: MeasurementMode,
) -> Result<ProfileSamples, EngineError> {
    let kind = profile_kind(profile, symbols)?;
    let column = value_column(kind, mode)?;
    let declared = profile.sample_type.len();
    if declared > 0 && column >= declared {
        return Err(EngineError::MissingValueColumn { column, declared });
    }

    let mut samples = Vec::with_capacity(profile.sample.len());
    let mut total: i64 = 0;
    for (i, raw) in profile.sample.iter().enumerate() {
        let value = match raw.value.get(column) {
            Some(&v) => v,
            None => {
                debug!(
                    "sample {i} has {} values, no column {column}; counting it as 0",
                    raw.value.len()
                );
                0
            }
        };

        // Raw stacks are leaf first.
        let mut functions = Vec::with_capacity(raw.location_id.len());
        for &id in raw.location_id.iter().rev() {
            match symbols.location(id) {
                Some(frames) => functions.extend_from_slice(frames),
                None => trace!("sample {i}: location {id} has no frames"),
            }
        }
        if let Some(leaf) = functions.last_mut() {
            leaf.self_value += value;
        }

        total = total.saturating_add(value);
        samples.push(Sample {
            functions,
            value,
            percent_of_total: 0.0,
        });
    }

    for sample in &mut samples {
        sample.percent_of_total = percent(sample.value, total);
    }

    debug!(
        "extracted {} {kind} samples in {mode} mode (column {column}), total {total}",
        samples.len()
    );

    Ok(ProfileSamples {
        kind,
        mode,
        column,
        samples,
        total,
        capture_duration_nanos: profile.duration_nanos,
    })
}

fn percent(value: i64, total: i64) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 / total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ProfileBuilder;

    fn extract(
        profile: &pprof::Profile,
        mode: MeasurementMode,
    ) -> Result<ProfileSamples, EngineError> {
        extract_samples(profile, &SymbolTable::resolve(profile), mode)
    }

    #[test]
    fn leaf_receives_self_value() {
        let profile = ProfileBuilder::cpu()
            .sample(&["A", "B", "C"], &[1, 42])
            .build();
        let extracted =
            extract(&profile, MeasurementMode::Cpu).expect("cpu mode should be accepted");
        let sample = &extracted.samples[0];
        let names: Vec<&str> = sample.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        let selfs: Vec<i64> = sample.functions.iter().map(|f| f.self_value).collect();
        assert_eq!(selfs, [0, 0, 42]);
        assert_eq!(sample.value, 42);
    }

    #[test]
    fn percentages_sum_to_100() {
        let profile = ProfileBuilder::cpu()
            .sample(&["main", "a"], &[1, 3])
            .sample(&["main", "b"], &[1, 7])
            .sample(&["main", "c"], &[1, 11])
            .sample(&["main", "d"], &[1, 0])
            .build();
        let extracted =
            extract(&profile, MeasurementMode::Default).expect("default mode should be accepted");
        assert_eq!(extracted.total, 21);
        let sum: f64 = extracted
            .samples
            .iter()
            .filter(|s| s.value != 0)
            .map(|s| s.percent_of_total)
            .sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_total_gives_zero_percentages() {
        let profile = ProfileBuilder::cpu()
            .sample(&["main"], &[1, 0])
            .sample(&["main", "idle"], &[1, 0])
            .build();
        let extracted =
            extract(&profile, MeasurementMode::Cpu).expect("cpu mode should be accepted");
        assert_eq!(extracted.total, 0);
        assert!(extracted.samples.iter().all(|s| s.percent_of_total == 0.0));
    }

    #[test]
    fn heap_inuse_reads_fourth_column() {
        let profile = ProfileBuilder::heap()
            .sample(&["main", "alloc"], &[2, 2048, 1, 512])
            .build();
        let inuse =
            extract(&profile, MeasurementMode::HeapInuse).expect("heap-inuse should be accepted");
        assert_eq!(inuse.column, 3);
        assert_eq!(inuse.total, 512);
        let alloc =
            extract(&profile, MeasurementMode::HeapAlloc).expect("heap-alloc should be accepted");
        assert_eq!(alloc.total, 2048);
        assert_eq!(alloc.kind, ProfileKind::Heap);
    }

    #[test]
    fn cpu_profile_rejects_heap_modes() {
        let profile = ProfileBuilder::cpu().sample(&["main"], &[1, 10]).build();
        for mode in [MeasurementMode::HeapAlloc, MeasurementMode::HeapInuse] {
            assert!(matches!(
                extract(&profile, mode),
                Err(EngineError::IncompatibleMode {
                    kind: ProfileKind::Cpu,
                    ..
                })
            ));
        }
    }

    #[test]
    fn heap_profile_rejects_cpu_mode() {
        let profile = ProfileBuilder::heap().build();
        assert!(matches!(
            extract(&profile, MeasurementMode::Cpu),
            Err(EngineError::IncompatibleMode { .. })
        ));
    }

    #[test]
    fn unknown_period_type_is_unsupported() {
        let profile = ProfileBuilder::new("wall", &["samples", "wall"]).build();
        match extract(&profile, MeasurementMode::Default) {
            Err(EngineError::UnsupportedProfileType(name)) => assert_eq!(name, "wall"),
            other => panic!("expected unsupported profile type, got {other:?}"),
        }
    }

    #[test]
    fn declared_columns_are_checked_once() {
        let profile = ProfileBuilder::new("space", &["alloc_objects", "alloc_space"])
            .sample(&["main"], &[1, 10])
            .build();
        assert!(matches!(
            extract(&profile, MeasurementMode::HeapInuse),
            Err(EngineError::MissingValueColumn {
                column: 3,
                declared: 2
            })
        ));
    }

    #[test]
    fn short_value_arrays_count_as_zero() {
        let profile = ProfileBuilder::new("cpu", &[])
            .sample(&["main"], &[5])
            .sample(&["main"], &[1, 10])
            .build();
        let extracted =
            extract(&profile, MeasurementMode::Cpu).expect("cpu mode should be accepted");
        assert_eq!(extracted.samples[0].value, 0);
        assert_eq!(extracted.total, 10);
    }
}
