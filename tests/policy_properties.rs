//! Property tests for precision policy resolution
//!
//! Ensures resolution satisfies its invariants for every policy:
//! - Set fields win, unset fields follow the model dtype
//! - Accumulation never drops below the main gradient precision
//! - Resolution is deterministic
//! - Non-float tags are rejected at construction and at resolution

use mp_policy::{FloatDtype, PolicyError, PrecisionPolicy, ScalarType};
use proptest::prelude::*;

// =============================================================================
// Strategy Helpers
// =============================================================================

fn float_dtype() -> impl Strategy<Value = FloatDtype> {
    prop::sample::select(FloatDtype::ALL.to_vec())
}

fn non_float_scalar() -> impl Strategy<Value = ScalarType> {
    prop::sample::select(vec![
        ScalarType::I64,
        ScalarType::I32,
        ScalarType::I16,
        ScalarType::I8,
        ScalarType::U8,
        ScalarType::Bool,
        ScalarType::Complex64,
        ScalarType::Complex128,
    ])
}

fn policy() -> impl Strategy<Value = PrecisionPolicy> {
    (
        prop::option::of(float_dtype()),
        prop::option::of(float_dtype()),
        prop::option::of(float_dtype()),
        prop::option::of(float_dtype()),
    )
        .prop_map(|(params, grads, comm, accum)| {
            PrecisionPolicy::from_dtypes(params, grads, comm, accum)
        })
}

// =============================================================================
// Resolution Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1_000))]

    #[test]
    fn prop_set_fields_win_unset_follow_model(policy in policy(), model in float_dtype()) {
        let resolved = policy.resolve(model);

        prop_assert_eq!(resolved.model_params, model);
        prop_assert_eq!(resolved.main_params, policy.main_params_dtype().unwrap_or(model));
        prop_assert_eq!(resolved.main_grads, policy.main_grads_dtype().unwrap_or(model));
        prop_assert_eq!(resolved.grad_comm, policy.grad_comm_dtype().unwrap_or(model));
    }

    #[test]
    fn prop_accumulation_at_least_main_grads(policy in policy(), model in float_dtype()) {
        let resolved = policy.resolve(model);
        let reduce = policy.grad_reduce_dtype(model);

        prop_assert!(resolved.grad_accum.rank() >= resolved.main_grads.rank());
        prop_assert!(resolved.grad_accum.rank() >= reduce.rank());
        prop_assert!(
            resolved.grad_accum == reduce || resolved.grad_accum == resolved.main_grads,
            "accumulation {} is neither the reduce dtype {} nor main grads {}",
            resolved.grad_accum,
            reduce,
            resolved.main_grads
        );
    }

    #[test]
    fn prop_resolution_is_deterministic(policy in policy(), model in float_dtype()) {
        prop_assert_eq!(policy.resolve(model), policy.resolve(model));
        prop_assert_eq!(policy.resolve_for(model.into()).unwrap(), policy.resolve(model));
        prop_assert_eq!(policy.resolve_named(model.name()).unwrap(), policy.resolve(model));
    }

    #[test]
    fn prop_non_float_model_is_unsupported(policy in policy(), tag in non_float_scalar()) {
        let is_unsupported =
            matches!(policy.resolve_for(tag), Err(PolicyError::UnsupportedDtype { .. }));
        prop_assert!(is_unsupported);
    }

    #[test]
    fn prop_construction_round_trips(
        params in prop::option::of(float_dtype()),
        grads in prop::option::of(float_dtype()),
        comm in prop::option::of(float_dtype()),
        accum in prop::option::of(float_dtype()),
    ) {
        let policy = PrecisionPolicy::new(
            params.map(ScalarType::from),
            grads.map(ScalarType::from),
            comm.map(ScalarType::from),
            accum.map(ScalarType::from),
        )
        .unwrap();

        prop_assert_eq!(policy.main_params_dtype(), params);
        prop_assert_eq!(policy.main_grads_dtype(), grads);
        prop_assert_eq!(policy.grad_comm_dtype(), comm);
        prop_assert_eq!(policy.grad_accum_dtype(), accum);
        prop_assert_eq!(policy, PrecisionPolicy::from_dtypes(params, grads, comm, accum));
    }

    #[test]
    fn prop_non_float_field_is_invalid(tag in non_float_scalar(), field in 0usize..4) {
        let mut tags = [None; 4];
        tags[field] = Some(tag);
        let result = PrecisionPolicy::new(tags[0], tags[1], tags[2], tags[3]);
        let is_invalid = matches!(result, Err(PolicyError::InvalidPrecision { .. }));
        prop_assert!(is_invalid);
    }

    #[test]
    fn prop_yaml_round_trip(policy in policy()) {
        let yaml = policy.to_yaml().unwrap();
        prop_assert_eq!(PrecisionPolicy::from_yaml(&yaml).unwrap(), policy);
    }
}

// =============================================================================
// Promotion Lattice Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_promote_is_upper_bound(a in float_dtype(), b in float_dtype()) {
        let p = a.promote(b);
        prop_assert!(p.rank() >= a.rank());
        prop_assert!(p.rank() >= b.rank());
        prop_assert!(p == a || p == b);
    }

    #[test]
    fn prop_promote_rank_is_commutative(a in float_dtype(), b in float_dtype()) {
        prop_assert_eq!(a.promote(b).rank(), b.promote(a).rank());
    }

    #[test]
    fn prop_promote_is_idempotent(a in float_dtype()) {
        prop_assert_eq!(a.promote(a), a);
    }
}
