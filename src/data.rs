use std::collections::HashSet;

use crate::error::{DataError, DataResult};

/// A single recorded result. Runs that could not finish are kept as `OutOfMemory`
/// so they can be told apart from a genuine zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Value(f64),
    Missing,
    OutOfMemory,
}

impl Measurement {
    pub fn value(&self) -> Option<f64> {
        match *self {
            Measurement::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Measurement::OutOfMemory)
    }

    /// Height used when the measurement is drawn as a bar.
    pub fn drawn_height(&self) -> f64 {
        self.value().unwrap_or(0.0)
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Measurement::Value(value)
    }
}

impl From<Option<f64>> for Measurement {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Measurement::Missing, Measurement::Value)
    }
}

/// Named curve of `(x, y)` pairs, e.g. compression ratio -> score.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSeries {
    name: String,
    points: Vec<(f64, f64)>,
}

impl NumericSeries {
    pub fn new<S: Into<String>>(name: S, points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self {
            name: name.into(),
            points: points.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|&(x, _)| x)
    }

    pub fn validate(&self) -> DataResult<()> {
        for (index, &(x, y)) in self.points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(DataError::NonFinite {
                    key: self.name.clone(),
                    index,
                });
            }
        }

        let mut seen = HashSet::new();
        for x in self.xs() {
            // 0.0 and -0.0 are the same position
            let key = if x == 0.0 { 0.0f64 } else { x };
            if !seen.insert(key.to_bits()) {
                return Err(DataError::DuplicatePoint {
                    series: self.name.clone(),
                    x,
                });
            }
        }

        Ok(())
    }

    /// Points ordered by x, ascending unless `descending` is set.
    pub fn sorted_points(&self, descending: bool) -> Vec<(f64, f64)> {
        let mut points = self.points.clone();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        if descending {
            points.reverse();
        }
        points
    }
}

/// Methods in legend order. Names are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodTable {
    series: Vec<NumericSeries>,
}

impl MethodTable {
    pub fn from_series(series: impl IntoIterator<Item = NumericSeries>) -> DataResult<Self> {
        let series: Vec<_> = series.into_iter().collect();

        ensure_unique_names(series.iter().map(NumericSeries::name))?;
        for s in &series {
            s.validate()?;
        }

        Ok(Self { series })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumericSeries> {
        self.series.iter()
    }

    /// Checks that every x value is a fraction, as compression ratios are.
    pub fn ensure_fractional_x(&self) -> DataResult<()> {
        for series in &self.series {
            for (index, x) in series.xs().enumerate() {
                if !(0.0..=1.0).contains(&x) {
                    return Err(DataError::OutOfRange {
                        key: series.name().to_owned(),
                        index,
                        value: x,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Per-category measurements, e.g. compute time for each chunk size.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySeries {
    pub name: String,
    pub values: Vec<Measurement>,
}

impl CategorySeries {
    pub fn new<S, M>(name: S, values: impl IntoIterator<Item = M>) -> Self
    where
        S: Into<String>,
        M: Into<Measurement>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Category series sharing one category axis. Every series has exactly one
/// measurement per category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    categories: Vec<String>,
    series: Vec<CategorySeries>,
}

impl CategoryTable {
    pub fn new<S: Into<String>>(
        categories: impl IntoIterator<Item = S>,
        series: impl IntoIterator<Item = CategorySeries>,
    ) -> DataResult<Self> {
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        let series: Vec<CategorySeries> = series.into_iter().collect();

        ensure_unique_names(series.iter().map(|s| s.name.as_str()))?;

        for s in &series {
            if s.values.len() != categories.len() {
                return Err(DataError::LengthMismatch {
                    key: s.name.clone(),
                    expected: categories.len(),
                    actual: s.values.len(),
                });
            }

            for (index, measurement) in s.values.iter().enumerate() {
                if let Some(value) = measurement.value() {
                    if !value.is_finite() {
                        return Err(DataError::NonFinite {
                            key: s.name.clone(),
                            index,
                        });
                    }
                }
            }
        }

        Ok(Self { categories, series })
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn series(&self, name: &str) -> DataResult<&CategorySeries> {
        self.series
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| DataError::MissingKey {
                source_name: "category table".to_owned(),
                key: name.to_owned(),
            })
    }
}

/// Needle-in-haystack recall of one method: `len_<context>` -> recall per depth.
#[derive(Debug, Clone, PartialEq)]
pub struct RecallSource {
    pub method: String,
    entries: Vec<(String, Vec<Option<f64>>)>,
}

impl RecallSource {
    pub fn new<S: Into<String>>(
        method: S,
        entries: impl IntoIterator<Item = (String, Vec<Option<f64>>)>,
    ) -> Self {
        Self {
            method: method.into(),
            entries: entries.into_iter().collect(),
        }
    }

    /// Builds a source where every value is present.
    pub fn complete<S, K, V>(method: S, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        S: Into<String>,
        K: Into<String>,
        V: IntoIterator<Item = f64>,
    {
        Self::new(
            method,
            entries
                .into_iter()
                .map(|(key, values)| (key.into(), values.into_iter().map(Some).collect())),
        )
    }

    pub fn get(&self, key: &str) -> Option<&[Option<f64>]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
    }
}

pub fn context_key(context_length: u32) -> String {
    format!("len_{context_length}")
}

fn ensure_unique_names<'a>(names: impl Iterator<Item = &'a str>) -> DataResult<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(DataError::DuplicateSeries {
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}
