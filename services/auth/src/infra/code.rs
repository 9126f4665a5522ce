use rand::RngExt;

use crate::domain::repository::CodeGenerator;
use crate::domain::types::{OTP_MAX, OTP_MIN};

/// Uniform six-digit codes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        rng.random_range(OTP_MIN..=OTP_MAX).to_string()
    }
}
