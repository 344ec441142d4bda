//! # Grouping
//!
//! Banner rows between runs of records that share a key. Keys are compared
//! as formatted text: two raw values that display the same belong to the
//! same run.

use crate::error::Result;
use crate::format::{format_value, Formats};
use crate::layout::cells::{banner_height, print_banner};
use crate::model::{FieldValue, GroupSpec, Record};
use crate::style::ResolvedOptions;
use crate::surface::Surface;

/// Format the key of `record` under `spec`.
pub(crate) fn format_key(spec: &GroupSpec, value: &FieldValue) -> String {
    let formats = spec.formats.clone().unwrap_or_default();
    format_value(value, &formats, spec.empty.as_deref().unwrap_or(""))
}

/// Whether two records share the compound key formed by `specs`. Always
/// false when either record is missing.
pub(crate) fn same_key(specs: &[GroupSpec], a: Option<&Record>, b: Option<&Record>) -> Result<bool> {
    let (Some(a), Some(b)) = (a, b) else {
        return Ok(false);
    };
    for spec in specs {
        let formats = spec.formats.clone().unwrap_or_default();
        let left = format_value(a.resolve(&spec.path)?, &formats, "");
        let right = format_value(b.resolve(&spec.path)?, &formats, "");
        if left != right {
            return Ok(false);
        }
    }
    Ok(true)
}

/// The banner row of a table grouped by one key.
pub(crate) struct Grouping<'t> {
    spec: &'t GroupSpec,
    formats: Formats,
    empty: &'t str,
}

impl<'t> Grouping<'t> {
    pub(crate) fn new(spec: &'t GroupSpec) -> Self {
        Self {
            spec,
            formats: spec.formats.clone().unwrap_or_default(),
            empty: spec.empty.as_deref().unwrap_or(""),
        }
    }

    fn key(&self, record: &Record) -> Result<String> {
        Ok(format_value(
            record.resolve(&self.spec.path)?,
            &self.formats,
            self.empty,
        ))
    }

    /// Whether `next` stays in the group of `record`.
    pub(crate) fn continues(&self, record: &Record, next: Option<&Record>) -> Result<bool> {
        same_key(std::slice::from_ref(self.spec), Some(record), next)
    }

    /// Height of the banner due before `curr` when `prev` precedes it. Zero
    /// when there is no `curr` or the key did not change.
    pub(crate) fn height<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        prev: Option<&Record>,
        curr: Option<&Record>,
        opts: &ResolvedOptions,
    ) -> Result<f64> {
        let Some(curr) = curr else {
            return Ok(0.0);
        };
        let key = self.key(curr)?;
        if let Some(prev) = prev {
            if self.key(prev)? == key {
                return Ok(0.0);
            }
        }
        Ok(banner_height(surface, &key, &opts.grouped, opts))
    }

    /// Draw the banner for `record`. A zero height draws nothing.
    pub(crate) fn print<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        record: &Record,
        x: f64,
        y: f64,
        height: f64,
        opts: &ResolvedOptions,
    ) -> Result<()> {
        if height == 0.0 {
            return Ok(());
        }
        let key = self.key(record)?;
        print_banner(surface, &key, x, y, height, &opts.grouped, opts);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::TableOptions;
    use crate::surface::PageRecorder;

    fn opts() -> ResolvedOptions {
        TableOptions::default().resolve((0.0, 0.0), 300.0)
    }

    fn rec(city: impl Into<FieldValue>) -> Record {
        FieldValue::map([("city", city.into())])
    }

    #[test]
    fn banner_only_when_key_changes() {
        let spec = GroupSpec::new("city");
        let grouping = Grouping::new(&spec);
        let mut surface = PageRecorder::default();
        let opts = opts();
        let (a1, a2, b) = (rec("A"), rec("A"), rec("B"));

        let first = grouping.height(&mut surface, None, Some(&a1), &opts).unwrap();
        assert!(first > 0.0);
        assert_eq!(grouping.height(&mut surface, Some(&a1), Some(&a2), &opts).unwrap(), 0.0);
        assert!(grouping.height(&mut surface, Some(&a2), Some(&b), &opts).unwrap() > 0.0);
        assert_eq!(grouping.height(&mut surface, Some(&b), None, &opts).unwrap(), 0.0);
    }

    #[test]
    fn keys_compare_as_formatted_text() {
        let spec = GroupSpec::new("city").formats(Formats::fixed(0));
        let grouping = Grouping::new(&spec);
        let mut surface = PageRecorder::default();
        let (a, b) = (rec(1.2), rec(0.9));
        assert_eq!(grouping.height(&mut surface, Some(&a), Some(&b), &opts()).unwrap(), 0.0);
        assert!(same_key(&[spec.clone()], Some(&a), Some(&b)).unwrap());
    }

    #[test]
    fn same_key_needs_both_records() {
        let specs = [GroupSpec::new("city")];
        let a = rec("A");
        assert!(!same_key(&specs, Some(&a), None).unwrap());
        assert!(!same_key(&specs, None, Some(&a)).unwrap());
        assert!(same_key(&specs, Some(&a), Some(&rec("A"))).unwrap());
    }

    #[test]
    fn compound_keys_compare_every_field() {
        let specs = [GroupSpec::new("a"), GroupSpec::new("b")];
        let x = FieldValue::map([("a", 1), ("b", 2)]);
        let y = FieldValue::map([("a", 1), ("b", 3)]);
        assert!(!same_key(&specs, Some(&x), Some(&y)).unwrap());
    }

    #[test]
    fn bad_path_is_an_error() {
        let spec = GroupSpec::new("city.name");
        let grouping = Grouping::new(&spec);
        let mut surface = PageRecorder::default();
        assert!(grouping
            .height(&mut surface, None, Some(&rec("A")), &opts())
            .is_err());
    }

    #[test]
    fn zero_height_prints_nothing() {
        let spec = GroupSpec::new("city");
        let mut surface = PageRecorder::default();
        Grouping::new(&spec)
            .print(&mut surface, &rec("A"), 0.0, 0.0, 0.0, &opts())
            .unwrap();
        assert!(surface.pages()[0].commands.is_empty());
    }
}
