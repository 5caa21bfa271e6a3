pub mod weight_model;
