use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::*;

use rolestats_core::{RoleStats, TransformType};

macro_rules! generate {
    ($name: ident, $type: ident) => {
        #[pyclass]
        pub struct $name {
            pub inner: RoleStats<$type>,
        }

        #[pymethods]
        impl $name {
            #[getter]
            fn transform_type(&self) -> PyResult<String> {
                Ok(self.inner.transform_type().to_string())
            }

            #[getter]
            fn raw_median(&self) -> PyResult<$type> {
                Ok(self.inner.raw_median())
            }

            #[getter]
            fn factor(&self) -> PyResult<$type> {
                Ok(self.inner.factor())
            }

            fn __len__(&self) -> PyResult<usize> {
                Ok(self.inner.raws().len())
            }

            #[classmethod]
            #[pyo3(signature = (arr, transform=None))]
            fn from_array(
                _cls: &PyType,
                py: Python,
                arr: PyReadonlyArray1<$type>,
                transform: Option<&str>,
            ) -> PyResult<Self> {
                if arr.len() == 0 {
                    return Err(PyValueError::new_err("Array must be non-empty!"));
                }
                let transform = match transform {
                    Some(name) => name.parse::<TransformType>()?,
                    None => TransformType::Unknown,
                };
                let arr = arr.as_array().to_vec();
                py.allow_threads(|| {
                    Ok(Self {
                        inner: RoleStats::with_transform(&arr, transform)?,
                    })
                })
            }

            fn set_list(&mut self, py: Python, arr: PyReadonlyArray1<$type>) -> PyResult<()> {
                if arr.len() == 0 {
                    return Err(PyValueError::new_err("Array must be non-empty!"));
                }
                let arr = arr.as_array().to_vec();
                let inner = &mut self.inner;
                py.allow_threads(|| Ok(inner.set_list(&arr)?))
            }

            fn rating(&self, x: $type) -> PyResult<$type> {
                Ok(self.inner.rating(x))
            }

            fn ratings<'py>(
                &self,
                py: Python<'py>,
                arr: PyReadonlyArray1<$type>,
            ) -> PyResult<&'py PyArray1<$type>> {
                let values = arr.as_array().to_vec();
                let ratings = py.allow_threads(|| self.inner.ratings(&values));
                Ok(PyArray1::from_vec(py, ratings))
            }
        }
    };
}

generate!(_RoleStatsInternal32, f32);
generate!(_RoleStatsInternal64, f64);

#[pymodule]
fn rolestats_rs(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<_RoleStatsInternal32>()?;
    m.add_class::<_RoleStatsInternal64>()?;
    Ok(())
}
