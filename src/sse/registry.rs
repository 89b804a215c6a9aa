//! Function registry: the six conversion functions the extension exposes.
//!
//! Each entry pairs the host-facing signature with a small per-row converter,
//! so the dispatcher runs one generic loop whatever the function.

use crate::proj::{GeodeticPoint, GridPoint, GridTransform};

use super::codec::{self, ShortRow};
use super::proto::{
    Capabilities, DataType, FieldDescription, FunctionDefinition, FunctionType, Parameter, Row,
    TableDescription,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    /// One numeric value per input row.
    Scalar,
    /// A full new row with a passthrough identifier, announced by a table description.
    Tensor,
}

impl FunctionKind {
    pub fn function_type(self) -> FunctionType {
        match self {
            FunctionKind::Scalar => FunctionType::Scalar,
            FunctionKind::Tensor => FunctionType::Tensor,
        }
    }
}

/// A named, typed column: an input parameter or an output field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub data_type: DataType,
}

const fn numeric(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        data_type: DataType::Numeric,
    }
}

type RowConverter = fn(&GridTransform, &Row) -> Result<Row, ShortRow>;

pub struct FunctionDescriptor {
    pub id: i32,
    pub name: &'static str,
    pub kind: FunctionKind,
    pub params: &'static [FieldSpec],
    /// Output columns; empty for scalar functions.
    pub output: &'static [FieldSpec],
    convert: RowConverter,
}

impl FunctionDescriptor {
    pub fn convert_row(&self, transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
        (self.convert)(transform, row)
    }

    /// Table description for a tensor function's output stream, `None` for scalars.
    pub fn table_description(&self, number_of_rows: usize) -> Option<TableDescription> {
        match self.kind {
            FunctionKind::Scalar => None,
            FunctionKind::Tensor => Some(TableDescription {
                fields: self
                    .output
                    .iter()
                    .map(|field| FieldDescription {
                        data_type: field.data_type as i32,
                        name: field.name.to_string(),
                        tags: Vec::new(),
                    })
                    .collect(),
                name: String::new(),
                number_of_rows: number_of_rows as i64,
            }),
        }
    }

    pub fn definition(&self) -> FunctionDefinition {
        FunctionDefinition {
            name: self.name.to_string(),
            function_type: self.kind.function_type() as i32,
            return_type: DataType::Numeric as i32,
            params: self
                .params
                .iter()
                .map(|param| Parameter {
                    data_type: param.data_type as i32,
                    name: param.name.to_string(),
                })
                .collect(),
            function_id: self.id,
        }
    }
}

const GRID_PARAMS: &[FieldSpec] = &[numeric("Easting"), numeric("Northing")];
const GEODETIC_PARAMS: &[FieldSpec] = &[numeric("Latitude"), numeric("Longitude")];
const GRID_ROW_PARAMS: &[FieldSpec] = &[numeric("ID"), numeric("Easting"), numeric("Northing")];
const GEODETIC_ROW_PARAMS: &[FieldSpec] =
    &[numeric("ID"), numeric("Latitude"), numeric("Longitude")];

const ID_FIELD: FieldSpec = FieldSpec {
    name: "ID",
    data_type: DataType::Dual,
};
const GEODETIC_OUTPUT: &[FieldSpec] = &[ID_FIELD, numeric("Latitude"), numeric("Longitude")];
const GRID_OUTPUT: &[FieldSpec] = &[ID_FIELD, numeric("Easting"), numeric("Northing")];

static FUNCTIONS: [FunctionDescriptor; 6] = [
    FunctionDescriptor {
        id: 0,
        name: "Easting2Latitude",
        kind: FunctionKind::Scalar,
        params: GRID_PARAMS,
        output: &[],
        convert: easting_to_latitude,
    },
    FunctionDescriptor {
        id: 1,
        name: "Northing2Longitude",
        kind: FunctionKind::Scalar,
        params: GRID_PARAMS,
        output: &[],
        convert: northing_to_longitude,
    },
    FunctionDescriptor {
        id: 2,
        name: "Latitude2Easting",
        kind: FunctionKind::Scalar,
        params: GEODETIC_PARAMS,
        output: &[],
        convert: latitude_to_easting,
    },
    FunctionDescriptor {
        id: 3,
        name: "Longitude2Northing",
        kind: FunctionKind::Scalar,
        params: GEODETIC_PARAMS,
        output: &[],
        convert: longitude_to_northing,
    },
    FunctionDescriptor {
        id: 4,
        name: "BNG2WGS84",
        kind: FunctionKind::Tensor,
        params: GRID_ROW_PARAMS,
        output: GEODETIC_OUTPUT,
        convert: bng_to_wgs84,
    },
    FunctionDescriptor {
        id: 5,
        name: "WGS842BNG",
        kind: FunctionKind::Tensor,
        params: GEODETIC_ROW_PARAMS,
        output: GRID_OUTPUT,
        convert: wgs84_to_bng,
    },
];

fn grid_at(transform: &GridTransform, row: &Row, at: usize) -> Result<GeodeticPoint, ShortRow> {
    let (easting, northing) = codec::read_pair(row, at)?;
    let point = GridPoint::new(easting, northing);
    Ok(transform.grid_to_geodetic(point))
}

fn geodetic_at(transform: &GridTransform, row: &Row, at: usize) -> Result<GridPoint, ShortRow> {
    let (latitude, longitude) = codec::read_pair(row, at)?;
    let point = GeodeticPoint::new(latitude, longitude);
    Ok(transform.geodetic_to_grid(point))
}

fn easting_to_latitude(transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
    Ok(codec::scalar_row(grid_at(transform, row, 0)?.latitude))
}

fn northing_to_longitude(transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
    Ok(codec::scalar_row(grid_at(transform, row, 0)?.longitude))
}

fn latitude_to_easting(transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
    Ok(codec::scalar_row(geodetic_at(transform, row, 0)?.easting))
}

fn longitude_to_northing(transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
    Ok(codec::scalar_row(geodetic_at(transform, row, 0)?.northing))
}

fn bng_to_wgs84(transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
    let point = grid_at(transform, row, 1)?;
    let id = codec::passthrough(row)?;
    Ok(codec::tensor_row(id, point.latitude, point.longitude))
}

fn wgs84_to_bng(transform: &GridTransform, row: &Row) -> Result<Row, ShortRow> {
    let point = geodetic_at(transform, row, 1)?;
    let id = codec::passthrough(row)?;
    Ok(codec::tensor_row(id, point.easting, point.northing))
}

/// Identity the extension reports in its capability manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectorInfo {
    pub plugin_identifier: String,
    pub plugin_version: String,
    pub allow_script: bool,
}

impl Default for ConnectorInfo {
    fn default() -> Self {
        Self {
            plugin_identifier: "GeoConvertSSE".to_string(),
            plugin_version: "1.0.0".to_string(),
            allow_script: false,
        }
    }
}

/// Read-only lookup over the registered functions.
#[derive(Clone, Copy)]
pub struct FunctionRegistry {
    functions: &'static [FunctionDescriptor],
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self {
            functions: &FUNCTIONS,
        }
    }
}

impl FunctionRegistry {
    pub fn get(&self, id: i32) -> Option<&'static FunctionDescriptor> {
        self.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'static, FunctionDescriptor> {
        let functions: &'static [FunctionDescriptor] = self.functions;
        functions.iter()
    }

    pub fn capabilities(&self, info: &ConnectorInfo) -> Capabilities {
        Capabilities {
            allow_script: info.allow_script,
            functions: self.iter().map(FunctionDescriptor::definition).collect(),
            plugin_identifier: info.plugin_identifier.clone(),
            plugin_version: info.plugin_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::proto::Dual;
    use approx::assert_relative_eq;

    fn numeric_row(values: &[f64]) -> Row {
        Row {
            duals: values.iter().copied().map(Dual::numeric).collect(),
        }
    }

    #[test]
    fn test_ids_are_dense_and_unique() {
        let registry = FunctionRegistry::default();
        let ids: Vec<i32> = registry.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert!(registry.get(6).is_none());
        assert!(registry.get(-1).is_none());
    }

    #[test]
    fn test_arity_matches_kind() {
        for f in FunctionRegistry::default().iter() {
            match f.kind {
                FunctionKind::Scalar => {
                    assert_eq!(f.params.len(), 2, "{}", f.name);
                    assert!(f.output.is_empty());
                }
                FunctionKind::Tensor => {
                    assert_eq!(f.params.len(), 3, "{}", f.name);
                    assert_eq!(f.output.len(), 3);
                    assert_eq!(f.output[0].data_type, DataType::Dual);
                }
            }
        }
    }

    #[test]
    fn test_table_description() {
        let registry = FunctionRegistry::default();
        let bng = registry.get(4).unwrap();
        let desc = bng.table_description(12).unwrap();
        assert_eq!(desc.number_of_rows, 12);
        let names: Vec<&str> = desc.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "Latitude", "Longitude"]);
        assert_eq!(desc.fields[1].data_type(), DataType::Numeric);

        assert!(registry.get(0).unwrap().table_description(12).is_none());
    }

    #[test]
    fn test_capabilities_manifest() {
        let registry = FunctionRegistry::default();
        let caps = registry.capabilities(&ConnectorInfo::default());
        assert_eq!(caps.plugin_identifier, "GeoConvertSSE");
        assert_eq!(caps.plugin_version, "1.0.0");
        assert!(!caps.allow_script);
        assert_eq!(caps.functions.len(), 6);

        let wgs = &caps.functions[5];
        assert_eq!(wgs.name, "WGS842BNG");
        assert_eq!(wgs.function_id, 5);
        assert_eq!(wgs.function_type(), FunctionType::Tensor);
        assert_eq!(wgs.return_type(), DataType::Numeric);
        let params: Vec<&str> = wgs.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["ID", "Latitude", "Longitude"]);
    }

    #[test]
    fn test_scalar_halves_match_tensor() {
        let registry = FunctionRegistry::default();
        let t = GridTransform::british_national_grid();
        let pair = numeric_row(&[651_409.903, 313_177.270]);
        let lat = registry.get(0).unwrap().convert_row(&t, &pair).unwrap();
        let lon = registry.get(1).unwrap().convert_row(&t, &pair).unwrap();
        let full = registry
            .get(4)
            .unwrap()
            .convert_row(&t, &numeric_row(&[1.0, 651_409.903, 313_177.270]))
            .unwrap();
        assert_eq!(lat.duals[0].num_data, full.duals[1].num_data);
        assert_eq!(lon.duals[0].num_data, full.duals[2].num_data);
    }

    #[test]
    fn test_geodetic_functions() {
        let registry = FunctionRegistry::default();
        let t = GridTransform::british_national_grid();
        let pair = numeric_row(&[52.657_977_8, 1.716_052_8]);
        let e = registry.get(2).unwrap().convert_row(&t, &pair).unwrap();
        let n = registry.get(3).unwrap().convert_row(&t, &pair).unwrap();
        assert_relative_eq!(e.duals[0].num_data, 651_409.9, epsilon = 1.0);
        assert_relative_eq!(n.duals[0].num_data, 313_177.3, epsilon = 1.0);
    }

    #[test]
    fn test_short_row_reports_arity() {
        let registry = FunctionRegistry::default();
        let t = GridTransform::british_national_grid();
        let err = registry
            .get(5)
            .unwrap()
            .convert_row(&t, &numeric_row(&[1.0, 52.0]))
            .unwrap_err();
        assert_eq!((err.expected, err.found), (3, 2));
    }
}
