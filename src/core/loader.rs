use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    convert::{TryFrom, TryInto},
    path::{Path, PathBuf},
};

/// One JSON object of a scene file, with access tracking so that typos in keys
/// surface as warnings.
pub struct InputParams {
    params: HashMap<String, InputParamsValue>,
    name: Cow<'static, str>,
    visited_names: HashSet<String>,
    base_dir: PathBuf,
}

#[derive(Debug)]
pub enum InputParamsValue {
    Int(i64),
    Float(f32),
    Bool(bool),
    String(String),
    Array(Vec<InputParamsValue>),
}

impl InputParamsValue {
    fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

macro_rules! params_get {
    ( $( ( $name:ident, $type:ty, $conv:ident, $hint:expr ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                pub fn [<get_ $name>](&mut self, key: &str) -> anyhow::Result<$type> {
                    let value = self.lookup(key)?;
                    match value.$conv() {
                        Some(value) => {
                            self.visited_names.insert(key.to_owned());
                            Ok(value as $type)
                        }
                        None => anyhow::bail!("{} - '{}' should be {}", self.name, key, $hint),
                    }
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _or>](&mut self, key: &str, fallback: $type) -> anyhow::Result<$type> {
                    if self.params.contains_key(key) {
                        self.[<get_ $name>](key)
                    } else {
                        Ok(fallback)
                    }
                }

                #[allow(dead_code)]
                pub fn [<get_ $name _array>](&mut self, key: &str) -> anyhow::Result<Vec<$type>> {
                    let error_info = format!("{} - '{}' should be an array of {}s", self.name, key, $hint);
                    let arr = match self.lookup(key)? {
                        InputParamsValue::Array(arr) => arr,
                        _ => anyhow::bail!(error_info),
                    };
                    let mut result = Vec::with_capacity(arr.len());
                    for ele in arr {
                        match ele.$conv() {
                            Some(ele) => result.push(ele as $type),
                            None => anyhow::bail!(error_info),
                        }
                    }
                    self.visited_names.insert(key.to_owned());
                    Ok(result)
                }
            }
        )+
    };
}

impl InputParams {
    pub fn set_name(&mut self, name: Cow<'static, str>) {
        self.name = name;
    }

    pub fn name(&self) -> &str {
        self.name.as_ref()
    }

    pub fn set_base_dir(&mut self, dir: PathBuf) {
        self.base_dir = dir;
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    fn lookup(&self, key: &str) -> anyhow::Result<&InputParamsValue> {
        match self.params.get(key) {
            Some(value) => Ok(value),
            None => anyhow::bail!("{} - there is no '{}' field", self.name, key),
        }
    }

    params_get! {
        (int, i64, as_int, "integer"),
        (float, f32, as_float, "float"),
        (bool, bool, as_bool, "boolean"),
    }

    pub fn get_float3(&mut self, key: &str) -> anyhow::Result<[f32; 3]> {
        let arr = self.get_float_array(key)?;
        if arr.len() != 3 {
            anyhow::bail!("{} - '{}' should be an array with 3 floats", self.name, key);
        }
        Ok([arr[0], arr[1], arr[2]])
    }

    pub fn get_float3_or(&mut self, key: &str, fallback: [f32; 3]) -> anyhow::Result<[f32; 3]> {
        if self.params.contains_key(key) {
            self.get_float3(key)
        } else {
            Ok(fallback)
        }
    }

    pub fn get_float_2darray(&mut self, key: &str) -> anyhow::Result<Vec<Vec<f32>>> {
        let error_info = format!("{} - '{}' should be a 2D array of floats", self.name, key);
        let outer = match self.lookup(key)? {
            InputParamsValue::Array(arr) => arr,
            _ => anyhow::bail!(error_info),
        };
        let mut result = Vec::with_capacity(outer.len());
        for row in outer {
            let row = match row {
                InputParamsValue::Array(row) => row,
                _ => anyhow::bail!(error_info),
            };
            let mut values = Vec::with_capacity(row.len());
            for ele in row {
                match ele.as_float() {
                    Some(ele) => values.push(ele),
                    None => anyhow::bail!(error_info),
                }
            }
            result.push(values);
        }
        self.visited_names.insert(key.to_owned());
        Ok(result)
    }

    pub fn get_str(&mut self, key: &str) -> anyhow::Result<String> {
        let value = match self.lookup(key)? {
            InputParamsValue::String(value) => value.clone(),
            _ => anyhow::bail!("{} - '{}' should be string", self.name, key),
        };
        self.visited_names.insert(key.to_owned());
        Ok(value)
    }

    pub fn get_str_or(&mut self, key: &str, fallback: &str) -> anyhow::Result<String> {
        if self.params.contains_key(key) {
            self.get_str(key)
        } else {
            Ok(fallback.to_owned())
        }
    }

    /// Relative paths are taken relative to the directory of the scene file.
    pub fn get_file_path(&mut self, key: &str) -> anyhow::Result<PathBuf> {
        let filename = self.get_str(key)?;
        let path = Path::new(&filename);
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(self.base_dir.join(path))
        }
    }

    pub fn check_unused_keys(&self) {
        for k in self.params.keys() {
            if !k.starts_with('#') && !self.visited_names.contains(k) {
                log::warn!("{} - unused key '{}'", self.name, k);
            }
        }
    }

    #[cfg(test)]
    pub fn unused_keys(&self) -> Vec<String> {
        let mut keys = self
            .params
            .keys()
            .filter(|k| !k.starts_with('#') && !self.visited_names.contains(*k))
            .cloned()
            .collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl TryFrom<&serde_json::Value> for InputParamsValue {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => {
                anyhow::bail!("can't convert to InputParamsValue from null json")
            }
            serde_json::Value::Bool(v) => Ok(Self::Bool(*v)),
            serde_json::Value::Number(v) => match (v.as_i64(), v.as_f64()) {
                (Some(v), _) => Ok(Self::Int(v)),
                (None, Some(v)) => Ok(Self::Float(v as f32)),
                _ => anyhow::bail!("number '{}' is out of range", v),
            },
            serde_json::Value::String(v) => Ok(Self::String(v.clone())),
            serde_json::Value::Array(arr) => {
                let mut values = Vec::with_capacity(arr.len());
                for v in arr {
                    match v.try_into() {
                        Ok(v) => values.push(v),
                        Err(e) => anyhow::bail!("can't convert array element: {}", e),
                    }
                }
                Ok(Self::Array(values))
            }
            serde_json::Value::Object(_) => {
                anyhow::bail!("can't convert to InputParamsValue from object json")
            }
        }
    }
}

impl TryFrom<&serde_json::Value> for InputParams {
    type Error = anyhow::Error;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        if let serde_json::Value::Object(value) = value {
            let mut params = HashMap::with_capacity(value.len());
            for (k, v) in value {
                match v.try_into() {
                    Ok(v) => {
                        params.insert(k.clone(), v);
                    }
                    Err(e) => anyhow::bail!("can't convert member '{}': {}", k, e),
                }
            }
            Ok(Self {
                params,
                name: Cow::Borrowed(""),
                visited_names: HashSet::new(),
                base_dir: PathBuf::default(),
            })
        } else {
            anyhow::bail!("can't convert to InputParams from non-object json value");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(json: &str) -> InputParams {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let mut params: InputParams = (&value).try_into().unwrap();
        params.set_name("test".into());
        params
    }

    #[test]
    fn ints_are_accepted_as_floats() {
        let mut p = params(r#"{ "radius": 2, "center": [0, 1.5, -2] }"#);
        assert_eq!(p.get_float("radius").unwrap(), 2.0);
        assert_eq!(p.get_float3("center").unwrap(), [0.0, 1.5, -2.0]);
    }

    #[test]
    fn errors_name_the_section_and_key() {
        let mut p = params(r#"{ "radius": "big" }"#);
        let err = p.get_float("radius").unwrap_err().to_string();
        assert!(err.contains("test"));
        assert!(err.contains("radius"));
        let err = p.get_float("missing").unwrap_err().to_string();
        assert!(err.contains("there is no 'missing' field"));
    }

    #[test]
    fn fallback_only_applies_to_missing_keys() {
        let mut p = params(r#"{ "max_depth": 1.5 }"#);
        assert_eq!(p.get_int_or("spp", 4).unwrap(), 4);
        assert!(p.get_int_or("max_depth", 8).is_err());
    }

    #[test]
    fn unused_keys_are_tracked() {
        let mut p = params(r##"{ "radius": 1, "raduis": 2, "#comment": "x" }"##);
        p.get_float("radius").unwrap();
        assert_eq!(p.unused_keys(), vec!["raduis".to_owned()]);
    }

    #[test]
    fn file_paths_resolve_against_base_dir() {
        let mut p = params(r#"{ "obj_file": "mesh/head.obj" }"#);
        p.set_base_dir(PathBuf::from("/scenes"));
        assert_eq!(
            p.get_file_path("obj_file").unwrap(),
            PathBuf::from("/scenes/mesh/head.obj")
        );
    }
}
