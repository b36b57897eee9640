use dyn_clone::DynClone;

// Define a trait for the target function of a root search
pub trait ObjFn: DynClone {
    fn call_scalar(&self, x: f64) -> f64;
}
dyn_clone::clone_trait_object!(ObjFn);

impl<F> ObjFn for F
where
    F: Fn(f64) -> f64 + Clone,
{
    fn call_scalar(&self, x: f64) -> f64 {
        self(x)
    }
}

// Wrapper for a plain function pointer or closure
#[derive(Clone)]
pub struct SingleDimFn<F>(pub F)
where
    F: Fn(f64) -> f64 + Clone;

// Convenience constructors
impl<F> SingleDimFn<F>
where
    F: Fn(f64) -> f64 + Clone,
{
    pub fn new(f: F) -> Self {
        SingleDimFn(f)
    }
}

impl<F> ObjFn for SingleDimFn<F>
where
    F: Fn(f64) -> f64 + Clone,
{
    fn call_scalar(&self, x: f64) -> f64 {
        (self.0)(x)
    }
}
