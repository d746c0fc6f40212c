//! Python bindings for the assault predictor using PyO3

use pyo3::prelude::*;
use pyo3::types::PyDict;
use crate::config::{AssaultConfig, Melee, Penalties, Skills, Target};
use crate::convergence::ConvergenceMode;
use crate::error::PredictError;
use crate::predictor::predict as run_prediction;
use crate::skills::Skill;
use crate::stats::SweepAxis;
use crate::sweep::sweep;
use crate::weapons::Weapon;
use rayon::prelude::*;

/// Map library errors onto the closest Python exception
fn to_py_err(err: PredictError) -> PyErr {
    let msg = err.to_string();
    match err {
        PredictError::Io(_) => PyErr::new::<pyo3::exceptions::PyIOError, _>(msg),
        PredictError::Json(_) | PredictError::Yaml(_) => PyErr::new::<pyo3::exceptions::PyValueError, _>(msg),
        _ if err.is_validation() => PyErr::new::<pyo3::exceptions::PyValueError, _>(msg),
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(msg),
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(format!("Failed to serialize results: {}", e)))
}

/// Helper to convert a {weapon name: charges} dict into weapon selections
fn apply_weapon_dict(config: &mut AssaultConfig, dict: &Bound<'_, PyDict>) -> PyResult<()> {
    for (key, value) in dict.iter() {
        let name: String = key.extract()?;
        let charges: u32 = value.extract()?;
        let weapon: Weapon = name.parse().map_err(to_py_err)?;
        config.weapons.set(weapon, charges);
    }
    Ok(())
}

fn parse_melee(name: &str) -> PyResult<Melee> {
    let mut melee = Melee::default();
    match name.to_lowercase().as_str() {
        "solid" => melee.solid = true,
        "wrestler" => melee.wrestler = true,
        "knife" => melee.knife = true,
        "none" | "bare_hands" | "" => {}
        _ => return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            format!("Invalid melee choice: {}", name)
        )),
    }
    Ok(melee)
}

fn parse_penalties(names: &[String]) -> PyResult<Penalties> {
    let mut penalties = Penalties::default();
    for name in names {
        match name.to_lowercase().as_str() {
            "armor" => penalties.armor = true,
            "roughneck" => penalties.roughneck = true,
            "berserker" => penalties.berserker = true,
            _ => return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
                format!("Invalid penalty: {}", name)
            )),
        }
    }
    Ok(penalties)
}

fn parse_axis(axis: &str) -> PyResult<SweepAxis> {
    match axis.to_lowercase().as_str() {
        "hp" | "target_hp" => Ok(SweepAxis::TargetHp),
        "pa" | "action_points" => Ok(SweepAxis::ActionPoints),
        _ => Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
            format!("Invalid sweep axis: {}", axis)
        )),
    }
}

/// Python-callable prediction - accepts individual keyword arguments
/// Returns a dict for GUI compatibility
#[pyfunction]
#[pyo3(signature = (action_points, hp, shooter_action_points=0, skills=None, melee=None, penalties=None, weapons=None, mush=false, base_success_rate=0.60, reference=false))]
fn predict(
    py: Python<'_>,
    action_points: u32,
    hp: u32,
    shooter_action_points: u32,
    skills: Option<Vec<String>>,
    melee: Option<&str>,
    penalties: Option<Vec<String>>,
    weapons: Option<&Bound<'_, PyDict>>,
    mush: bool,
    base_success_rate: f64,
    reference: bool,
) -> PyResult<PyObject> {
    let mut config = AssaultConfig::new(action_points, hp);
    config.target = Some(Target { hp, mush });
    config.shooter_action_points = shooter_action_points;
    config.base_success_rate = base_success_rate;
    if reference {
        config.convergence = ConvergenceMode::reference();
    }
    config.skills = skills
        .unwrap_or_default()
        .iter()
        .map(|name| name.parse::<Skill>())
        .collect::<Result<Skills, _>>()
        .map_err(to_py_err)?;
    if let Some(name) = melee {
        config.melee = parse_melee(name)?;
    }
    config.penalties = parse_penalties(&penalties.unwrap_or_default())?;
    if let Some(dict) = weapons {
        apply_weapon_dict(&mut config, dict)?;
    }

    let prediction = py.allow_threads(|| run_prediction(&config)).map_err(to_py_err)?;

    let result_dict = PyDict::new(py);
    result_dict.set_item("expected_hits", prediction.expected_hits)?;
    result_dict.set_item("expected_damage", prediction.expected_damage)?;
    result_dict.set_item("kill_probability", prediction.kill_probability)?;
    result_dict.set_item("success_rate", prediction.success_rate)?;
    result_dict.set_item("damage_per_hit", prediction.damage_per_hit)?;
    result_dict.set_item("charges_used", prediction.charges_used)?;
    result_dict.set_item("adjusted_attempts", prediction.adjusted_attempts)?;
    result_dict.set_item("needed_hits", prediction.needed_hits)?;
    result_dict.set_item("summary", prediction.summary())?;

    Ok(result_dict.into())
}

/// Python-callable prediction from a JSON config string
#[pyfunction]
fn predict_json(py: Python<'_>, config_json: &str) -> PyResult<String> {
    let config = AssaultConfig::from_json(config_json).map_err(to_py_err)?;
    let prediction = py.allow_threads(|| run_prediction(&config)).map_err(to_py_err)?;
    to_json(&prediction)
}

/// Python-callable prediction from a YAML or JSON file
#[pyfunction]
fn predict_from_file(py: Python<'_>, config_path: &str) -> PyResult<String> {
    let config = AssaultConfig::from_file(config_path).map_err(to_py_err)?;
    let prediction = py.allow_threads(|| run_prediction(&config)).map_err(to_py_err)?;
    to_json(&prediction)
}

/// Python-callable batch prediction - evaluates many configs at once
#[pyfunction]
#[pyo3(signature = (config_jsons, parallel=false))]
fn predict_batch(py: Python<'_>, config_jsons: Vec<String>, parallel: bool) -> PyResult<Vec<String>> {
    // Parse all configs first (inside GIL)
    let configs = config_jsons
        .iter()
        .map(|json| AssaultConfig::from_json(json))
        .collect::<Result<Vec<_>, _>>()
        .map_err(to_py_err)?;

    let results = py.allow_threads(|| {
        if parallel {
            configs.par_iter().map(run_prediction).collect::<Result<Vec<_>, _>>()
        } else {
            configs.iter().map(run_prediction).collect::<Result<Vec<_>, _>>()
        }
    });

    results.map_err(to_py_err)?.iter().map(to_json).collect()
}

/// Python-callable sweep over target HP ("hp") or action points ("pa")
#[pyfunction]
#[pyo3(signature = (config_json, axis, start, end, parallel=false))]
fn sweep_json(py: Python<'_>, config_json: &str, axis: &str, start: u32, end: u32, parallel: bool) -> PyResult<String> {
    let config = AssaultConfig::from_json(config_json).map_err(to_py_err)?;
    let axis = parse_axis(axis)?;
    let rows = py
        .allow_threads(|| sweep(&config, axis, start..=end, parallel))
        .map_err(to_py_err)?;
    to_json(&rows)
}

/// Get number of threads used for parallel sweeps
#[pyfunction]
fn get_thread_count() -> PyResult<usize> {
    Ok(rayon::current_num_threads())
}

/// Get number of available CPU cores
#[pyfunction]
fn get_available_cores() -> PyResult<usize> {
    Ok(num_cpus::get())
}

/// Python module definition
#[pymodule]
fn assault_odds(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(predict, m)?)?;
    m.add_function(wrap_pyfunction!(predict_json, m)?)?;
    m.add_function(wrap_pyfunction!(predict_from_file, m)?)?;
    m.add_function(wrap_pyfunction!(predict_batch, m)?)?;
    m.add_function(wrap_pyfunction!(sweep_json, m)?)?;
    m.add_function(wrap_pyfunction!(get_thread_count, m)?)?;
    m.add_function(wrap_pyfunction!(get_available_cores, m)?)?;
    Ok(())
}
