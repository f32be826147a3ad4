use super::*;

/// Host types a kernel buffer can be viewed as.
pub trait HasElementType: Copy + 'static {
    const SCALAR: ScalarType;
}

macro_rules! impl_element_type_ext {
    ($($ty:ty => $scalar:expr),* $(,)?) => {
        $(impl HasElementType for $ty { const SCALAR: ScalarType = $scalar; })*
    };
}

impl_element_type_ext! {
    f64 => ScalarType::Float64,
    i32 => ScalarType::Int32,
}
