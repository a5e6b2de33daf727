//! Variable management for the SAT encoding

use crate::error::SolverError;
use crate::snake::{Cell, GridSize};
use std::collections::HashMap;

/// Named variables of the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariableType {
    /// Cell (row, col) is on the snake
    Cell { row: usize, col: usize },
}

/// Manages SAT variables and their mapping to integers
#[derive(Debug)]
pub struct VariableManager {
    /// Map from variable type to SAT variable ID (positive integer)
    variable_map: HashMap<VariableType, i32>,
    /// Next available variable ID
    next_id: i32,
    /// Number of anonymous counter variables handed out
    auxiliary_count: usize,
    size: GridSize,
}

impl VariableManager {
    pub fn new(size: GridSize) -> Self {
        Self {
            variable_map: HashMap::new(),
            next_id: 1, // SAT variables start from 1
            auxiliary_count: 0,
            size,
        }
    }

    /// Get or create a variable ID for the given variable type
    pub fn get_variable(&mut self, var_type: VariableType) -> Result<i32, SolverError> {
        if let Some(&id) = self.variable_map.get(&var_type) {
            return Ok(id);
        }

        self.validate_variable(&var_type)?;

        let id = self.allocate()?;
        self.variable_map.insert(var_type, id);
        Ok(id)
    }

    /// Variable for "cell is on the snake"
    pub fn cell_variable(&mut self, cell: Cell) -> Result<i32, SolverError> {
        self.get_variable(VariableType::Cell { row: cell.row, col: cell.col })
    }

    /// Look up an existing cell variable without creating it
    pub fn existing_cell_variable(&self, cell: Cell) -> Option<i32> {
        self.variable_map
            .get(&VariableType::Cell { row: cell.row, col: cell.col })
            .copied()
    }

    /// All cell variables in row-major order
    pub fn all_cell_variables(&mut self) -> Result<Vec<i32>, SolverError> {
        let cells: Vec<Cell> = self.size.cells().collect();
        cells.into_iter().map(|cell| self.cell_variable(cell)).collect()
    }

    /// A fresh anonymous variable, used by cardinality encodings
    pub fn auxiliary_variable(&mut self) -> Result<i32, SolverError> {
        let id = self.allocate()?;
        self.auxiliary_count += 1;
        Ok(id)
    }

    fn allocate(&mut self) -> Result<i32, SolverError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(SolverError::VariableOverflow {
            count: self.variable_count(),
        })?;
        Ok(id)
    }

    /// Get the total number of variables created
    pub fn variable_count(&self) -> usize {
        (self.next_id - 1) as usize
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Validate that a variable type is within bounds
    fn validate_variable(&self, var_type: &VariableType) -> Result<(), SolverError> {
        match *var_type {
            VariableType::Cell { row, col } => {
                if !self.size.contains(Cell::new(row, col)) {
                    return Err(SolverError::UnknownVariable(*var_type));
                }
            }
        }
        Ok(())
    }

    /// Get statistics about variable usage
    pub fn statistics(&self) -> VariableStatistics {
        VariableStatistics {
            total_variables: self.variable_count(),
            cell_variables: self.variable_map.len(),
            auxiliary_variables: self.auxiliary_count,
        }
    }
}

/// Statistics about variable usage
#[derive(Debug, Clone)]
pub struct VariableStatistics {
    pub total_variables: usize,
    pub cell_variables: usize,
    pub auxiliary_variables: usize,
}

impl std::fmt::Display for VariableStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Variable Statistics:")?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Cell variables: {}", self.cell_variables)?;
        writeln!(f, "  Auxiliary variables: {}", self.auxiliary_variables)?;
        Ok(())
    }
}
