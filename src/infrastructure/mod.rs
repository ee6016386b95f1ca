//! Infrastructure layer - storage backends, services and the startup gate

pub mod department;
pub mod gate;
pub mod logging;
pub mod storage;
