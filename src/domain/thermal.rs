//! Demo configuration and the fixed thermal model result.
//!
//! No solver runs here. [`solve`] always returns the same result set so
//! clients can be built against the response shape.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use super::CoolingData;

/// Solver input: the five blob arrays of a configuration
pub type ThermalModel = CoolingData;

/// Steady-state temperature at a named node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NodeTemperature {
    #[schema(example = "junction")]
    pub node: String,
    /// Kelvin
    #[schema(example = 358.15)]
    pub temperature: f64,
}

/// Heat flow between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HeatFlow {
    pub from: String,
    pub to: String,
    /// Watts
    pub watts: f64,
}

/// Result set returned by the solve endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThermalSolution {
    pub converged: bool,
    pub iterations: u32,
    pub temperatures: Vec<NodeTemperature>,
    pub heat_flows: Vec<HeatFlow>,
    /// Pa
    pub pressure_drop: f64,
}

/// Example configuration with one of each blob kind.
pub fn demo_model() -> ThermalModel {
    CoolingData {
        components: Some(vec![
            json!({"id": "igbt", "type": "heat_source", "power": 250.0}),
            json!({"id": "baseplate", "type": "solid", "material": "copper", "mass": 0.45}),
            json!({"id": "cold_plate", "type": "solid", "material": "aluminium", "mass": 1.2}),
        ]),
        losses: Some(vec![
            json!({"component": "igbt", "kind": "conduction", "watts": 180.0}),
            json!({"component": "igbt", "kind": "switching", "watts": 70.0}),
        ]),
        faces: Some(vec![
            json!({"id": "f1", "between": ["igbt", "baseplate"], "area": 0.0012, "resistance": 0.05}),
            json!({"id": "f2", "between": ["baseplate", "cold_plate"], "area": 0.0040, "resistance": 0.02}),
            json!({"id": "f3", "between": ["cold_plate", "coolant"], "area": 0.0150, "htc": 4500.0}),
        ]),
        passages: Some(vec![
            json!({"id": "channel", "hydraulic_diameter": 0.004, "length": 0.3, "fluid": "coolant"}),
        ]),
        fluids: Some(vec![
            json!({"id": "coolant", "name": "water-glycol 50/50", "inlet_temperature": 338.15, "flow_rate": 0.1667}),
        ]),
    }
}

/// Fixed result set, independent of the model.
pub fn solve(_model: &ThermalModel) -> ThermalSolution {
    ThermalSolution {
        converged: true,
        iterations: 12,
        temperatures: vec![
            NodeTemperature {
                node: "igbt".to_string(),
                temperature: 371.4,
            },
            NodeTemperature {
                node: "baseplate".to_string(),
                temperature: 358.9,
            },
            NodeTemperature {
                node: "cold_plate".to_string(),
                temperature: 353.9,
            },
            NodeTemperature {
                node: "coolant_outlet".to_string(),
                temperature: 338.5,
            },
        ],
        heat_flows: vec![
            HeatFlow {
                from: "igbt".to_string(),
                to: "baseplate".to_string(),
                watts: 250.0,
            },
            HeatFlow {
                from: "baseplate".to_string(),
                to: "cold_plate".to_string(),
                watts: 250.0,
            },
            HeatFlow {
                from: "cold_plate".to_string(),
                to: "coolant".to_string(),
                watts: 250.0,
            },
        ],
        pressure_drop: 5120.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_ignores_input() {
        let empty = ThermalModel::default();
        assert_eq!(solve(&empty), solve(&demo_model()));
    }

    #[test]
    fn test_demo_model_has_every_array() {
        let model = demo_model();
        assert!(model.components.is_some());
        assert!(model.losses.is_some());
        assert!(model.faces.is_some());
        assert!(model.passages.is_some());
        assert!(model.fluids.is_some());
    }

    #[test]
    fn test_heat_balance_of_fixed_result() {
        let solution = solve(&demo_model());
        assert!(solution.converged);
        assert!(solution.heat_flows.iter().all(|f| f.watts == 250.0));
    }
}
