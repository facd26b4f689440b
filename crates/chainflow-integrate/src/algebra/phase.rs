//! Component-wise algebra over phase-space pairs.

use smallvec::SmallVec;

use super::Algebra;
use crate::error::AlgebraError;
use crate::ops::ScaleSum;
use crate::system::Phase;

type Parts<'a, S> = SmallVec<[&'a S; ScaleSum::MAX_ARITY]>;

fn positions<'a, S>(sources: &[&'a Phase<S>]) -> Parts<'a, S> {
    sources.iter().map(|s| &s.q).collect()
}

fn momenta<'a, S>(sources: &[&'a Phase<S>]) -> Parts<'a, S> {
    sources.iter().map(|s| &s.p).collect()
}

/// Any algebra over `S` applies to `Phase<S>` one component at a time.
impl<S, A: Algebra<S>> Algebra<Phase<S>> for A {
    fn combine(
        &self,
        dest: &mut Phase<S>,
        sources: &[&Phase<S>],
        op: &ScaleSum,
    ) -> Result<(), AlgebraError> {
        <A as Algebra<S>>::combine(self, &mut dest.q, &positions(sources), op)?;
        <A as Algebra<S>>::combine(self, &mut dest.p, &momenta(sources), op)
    }

    fn accumulate(
        &self,
        dest: &mut Phase<S>,
        sources: &[&Phase<S>],
        op: &ScaleSum,
    ) -> Result<(), AlgebraError> {
        <A as Algebra<S>>::accumulate(self, &mut dest.q, &positions(sources), op)?;
        <A as Algebra<S>>::accumulate(self, &mut dest.p, &momenta(sources), op)
    }

    fn zeros_like(&self, template: &Phase<S>) -> Phase<S> {
        Phase::new(
            <A as Algebra<S>>::zeros_like(self, &template.q),
            <A as Algebra<S>>::zeros_like(self, &template.p),
        )
    }

    fn same_shape(&self, a: &Phase<S>, b: &Phase<S>) -> bool {
        <A as Algebra<S>>::same_shape(self, &a.q, &b.q)
            && <A as Algebra<S>>::same_shape(self, &a.p, &b.p)
    }

    fn shape(&self, state: &Phase<S>) -> usize {
        <A as Algebra<S>>::shape(self, &state.q)
    }
}
