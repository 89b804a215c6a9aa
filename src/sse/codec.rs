//! Row codec: wire rows of tagged duals <-> plain numbers.

use super::proto::{Dual, Row};

/// A row carried fewer values than the function reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShortRow {
    pub expected: usize,
    pub found: usize,
}

/// Numeric values at `offset` and `offset + 1`.
pub fn read_pair(row: &Row, offset: usize) -> Result<(f64, f64), ShortRow> {
    match row.duals.get(offset..offset + 2) {
        Some([first, second]) => Ok((first.num_data, second.num_data)),
        _ => Err(ShortRow {
            expected: offset + 2,
            found: row.duals.len(),
        }),
    }
}

/// The leading identifier, copied untouched (both number and string).
pub fn passthrough(row: &Row) -> Result<Dual, ShortRow> {
    match row.duals.first() {
        Some(id) => Ok(id.clone()),
        None => Err(ShortRow {
            expected: 1,
            found: 0,
        }),
    }
}

pub fn scalar_row(value: f64) -> Row {
    Row {
        duals: vec![Dual::numeric(value)],
    }
}

pub fn tensor_row(id: Dual, first: f64, second: f64) -> Row {
    Row {
        duals: vec![id, Dual::numeric(first), Dual::numeric(second)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[f64]) -> Row {
        Row {
            duals: values.iter().copied().map(Dual::numeric).collect(),
        }
    }

    fn short(expected: usize, found: usize) -> ShortRow {
        ShortRow { expected, found }
    }

    #[test]
    fn test_read_pair_at_offset() {
        let r = row(&[7.0, 651_409.903, 313_177.270]);
        assert_eq!(read_pair(&r, 1).unwrap(), (651_409.903, 313_177.270));
        assert_eq!(read_pair(&r, 0).unwrap(), (7.0, 651_409.903));
    }

    #[test]
    fn test_read_pair_short_row() {
        let r = row(&[1.0, 2.0]);
        assert_eq!(read_pair(&r, 1), Err(short(3, 2)));
        assert_eq!(read_pair(&row(&[]), 0), Err(short(2, 0)));
    }

    #[test]
    fn test_extra_values_ignored() {
        let r = row(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(read_pair(&r, 0).unwrap(), (1.0, 2.0));
    }

    #[test]
    fn test_passthrough_keeps_string_tag() {
        let id = Dual {
            num_data: f64::NAN,
            str_data: "site-42".into(),
        };
        let r = Row {
            duals: vec![id, Dual::numeric(1.0)],
        };
        let copied = passthrough(&r).unwrap();
        assert_eq!(copied.str_data, "site-42");
        assert!(copied.num_data.is_nan());
    }

    #[test]
    fn test_encoded_shapes() {
        assert_eq!(scalar_row(52.5).duals.len(), 1);
        let t = tensor_row(Dual::numeric(3.0), 52.5, 1.7);
        assert_eq!(t.duals.len(), 3);
        assert_eq!(t.duals[0].num_data, 3.0);
        assert_eq!(t.duals[2].num_data, 1.7);
    }
}
