use crate::domain::model::QuantumPulse;
use async_trait::async_trait;

/// Best-effort reachability probe. Transport failures answer `false`.
#[async_trait]
pub trait StatusChecker: Send + Sync {
    async fn check(&self) -> bool;
}

/// Foreign compute library. `None` means the library is unavailable.
pub trait NativeCompute: Send + Sync {
    fn is_available(&self) -> bool;
    fn compute(&self, cosmos_value: i32, aeration: i32) -> Option<i32>;
}

/// Optional quantum backend. `None` means no backend is present.
pub trait QuantumBackend: Send + Sync {
    fn run_fib_pulse(&self, fib_terms: usize) -> Option<QuantumPulse>;
}

#[async_trait]
impl<T: StatusChecker + ?Sized> StatusChecker for Box<T> {
    async fn check(&self) -> bool {
        (**self).check().await
    }
}

impl<T: NativeCompute + ?Sized> NativeCompute for Box<T> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn compute(&self, cosmos_value: i32, aeration: i32) -> Option<i32> {
        (**self).compute(cosmos_value, aeration)
    }
}

impl<T: QuantumBackend + ?Sized> QuantumBackend for Box<T> {
    fn run_fib_pulse(&self, fib_terms: usize) -> Option<QuantumPulse> {
        (**self).run_fib_pulse(fib_terms)
    }
}
