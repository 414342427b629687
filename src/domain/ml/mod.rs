pub mod feature_registry;
pub mod feature_vector;
pub mod model_family;

pub use feature_vector::FeatureVector;
pub use model_family::ModelFamily;
