pub mod attribute;
pub mod classpath;
pub mod stubs;
pub mod types;

pub use attribute::{attribute, attribute_fragment, is_type_ref};
pub use classpath::{ClassLookup, Classpath};
pub use stubs::standard_classpath;
pub use types::{JavaType, MethodType, Prim};
