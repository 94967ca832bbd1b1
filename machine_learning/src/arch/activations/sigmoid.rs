#[derive(Clone, Debug, Default)]
pub struct Sigmoid {
    amp: f32,
}

impl Sigmoid {
    pub fn new(amp: f32) -> Self {
        Self { amp }
    }

    pub fn f(&self, z: f32) -> f32 {
        self.amp / (1. + (-z).exp())
    }

    pub fn df(&self, z: f32) -> f32 {
        let e = (-z).exp();

        // Saturated tails would otherwise produce inf / inf.
        if !e.is_finite() {
            return 0.;
        }

        (self.amp * e) / (e + 1.).powi(2)
    }
}
