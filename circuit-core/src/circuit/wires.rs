use crate::field::CircuitField;
use crate::utils::alloc::try_allocate_vec;
use crate::utils::errors::CircuitError;

/// Write-once storage for wire values, indexed by wire id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireTable<F> {
    values: Vec<Option<F>>,
}

impl<F: CircuitField> WireTable<F> {
    pub fn new(num_wires: usize) -> Result<Self, CircuitError> {
        let values = try_allocate_vec(num_wires, None)
            .map_err(|_| CircuitError::WireAllocation { num_wires })?;
        Ok(Self { values })
    }

    pub fn num_wires(&self) -> usize {
        self.values.len()
    }

    pub fn num_assigned(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    pub fn get(&self, wire: usize) -> Option<F> {
        self.values.get(wire).copied().flatten()
    }

    pub fn assign(&mut self, wire: usize, value: F) -> Result<(), CircuitError> {
        let slot = self
            .values
            .get_mut(wire)
            .ok_or(CircuitError::UndefinedWire { wire })?;
        if slot.is_some() {
            return Err(CircuitError::WireReassigned { wire });
        }
        *slot = Some(value);
        Ok(())
    }

    /// Reads a wire on behalf of gate `gate`.
    pub fn read(&self, gate: usize, wire: usize) -> Result<F, CircuitError> {
        match self.values.get(wire) {
            None => Err(CircuitError::UndefinedWire { wire }),
            Some(None) => Err(CircuitError::EvaluationOrderViolation { gate, wire }),
            Some(Some(value)) => Ok(*value),
        }
    }
}
