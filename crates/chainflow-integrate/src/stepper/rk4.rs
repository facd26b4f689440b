//! Classic fourth-order Runge–Kutta.

use super::FirstOrderStepper;
use crate::algebra::Algebra;
use crate::error::StepperError;
use crate::ops::ScaleSum;
use crate::system::FirstOrderSystem;

#[derive(Debug)]
struct Buffers<S> {
    k1: S,
    k2: S,
    k3: S,
    k4: S,
    tmp: S,
}

/// The classic 4-stage, order-4 Runge–Kutta method.
#[derive(Debug)]
pub struct RungeKutta4<S, A> {
    algebra: A,
    buffers: Option<Buffers<S>>,
}

impl<S, A: Algebra<S>> RungeKutta4<S, A> {
    /// Stepper combining states with `algebra`.
    pub fn new(algebra: A) -> Self {
        Self {
            algebra,
            buffers: None,
        }
    }
}

impl<S, A: Algebra<S>> FirstOrderStepper<S> for RungeKutta4<S, A> {
    fn do_step<Y>(&mut self, system: &Y, x: &mut S, dt: f64) -> Result<(), StepperError>
    where
        Y: FirstOrderSystem<S> + ?Sized,
    {
        let alg = &self.algebra;
        let b = self.buffers.get_or_insert_with(|| Buffers {
            k1: alg.zeros_like(x),
            k2: alg.zeros_like(x),
            k3: alg.zeros_like(x),
            k4: alg.zeros_like(x),
            tmp: alg.zeros_like(x),
        });
        if !alg.same_shape(&b.tmp, x) {
            return Err(StepperError::ShapeMismatch {
                expected: alg.shape(&b.tmp),
                actual: alg.shape(x),
            });
        }
        let half = ScaleSum::scale_sum2(1.0, 0.5 * dt);
        system.rhs(x, &mut b.k1)?;
        alg.combine(&mut b.tmp, &[&*x, &b.k1], &half)?;
        system.rhs(&b.tmp, &mut b.k2)?;
        alg.combine(&mut b.tmp, &[&*x, &b.k2], &half)?;
        system.rhs(&b.tmp, &mut b.k3)?;
        alg.combine(&mut b.tmp, &[&*x, &b.k3], &ScaleSum::scale_sum2(1.0, dt))?;
        system.rhs(&b.tmp, &mut b.k4)?;
        alg.accumulate(
            x,
            &[&b.k1, &b.k2, &b.k3, &b.k4],
            &ScaleSum::new([1.0, dt / 6.0, dt / 3.0, dt / 3.0, dt / 6.0]),
        )?;
        Ok(())
    }

    fn order(&self) -> usize {
        4
    }

    fn reset(&mut self) {
        self.buffers = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::FlatAlgebra;

    /// `x' = x`.
    struct Growth;

    impl FirstOrderSystem<Vec<f64>> for Growth {
        fn rhs(&self, x: &Vec<f64>, dxdt: &mut Vec<f64>) -> Result<(), StepperError> {
            dxdt.copy_from_slice(x);
            Ok(())
        }
    }

    #[test]
    fn one_step_matches_taylor_polynomial() {
        let mut st = RungeKutta4::new(FlatAlgebra);
        let mut x = vec![1.0];
        let h: f64 = 0.1;
        st.do_step(&Growth, &mut x, h).unwrap();
        let taylor = 1.0 + h + h * h / 2.0 + h.powi(3) / 6.0 + h.powi(4) / 24.0;
        assert!((x[0] - taylor).abs() < 1e-15);
    }

    #[test]
    fn fourth_order_convergence() {
        let err = |n: usize| {
            let mut st = RungeKutta4::new(FlatAlgebra);
            let mut x = vec![1.0];
            for _ in 0..n {
                st.do_step(&Growth, &mut x, 1.0 / n as f64).unwrap();
            }
            (x[0] - std::f64::consts::E).abs()
        };
        let ratio = err(10) / err(20);
        assert!(ratio > 14.0 && ratio < 18.0, "ratio = {ratio}");
    }
}
