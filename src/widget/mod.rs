/// Dashboard widget and dataset model.
pub mod model;
