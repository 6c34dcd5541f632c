//! Overload de-duplication.
//!
//! Declaration merging often produces several signatures that only differ in
//! parameter names (e.g. `console.clear` declared by two lib files). For
//! static analysis those are the same signature.
use crate::adt::Signature;

/// Drops signatures whose shape was already seen. First occurrence wins and
/// survivors keep their order. O(n²) in the number of signatures.
pub fn collapse_signatures(signatures: Vec<Signature>) -> Vec<Signature> {
    if signatures.len() < 2 {
        return signatures;
    }
    let mut collapsed: Vec<Signature> = Vec::with_capacity(signatures.len());
    for sig in signatures {
        if !collapsed.iter().any(|seen| same_shape(seen, &sig)) {
            collapsed.push(sig);
        }
    }
    collapsed
}

/// Equal arity, equal return type, pairwise equal parameter types. Names are
/// ignored.
pub fn same_shape(a: &Signature, b: &Signature) -> bool {
    a.parameters.len() == b.parameters.len()
        && a.return_type == b.return_type
        && a.parameters.iter()
            .zip(&b.parameters)
            .all(|(pa, pb)| pa.ty == pb.ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adt::{Parameter, Type};

    fn sig(params: &[(&str, Type)], ret: Type) -> Signature {
        Signature::new(
            params.iter().map(|(n, t)| Parameter::new(*n, t.clone())).collect(),
            ret,
        )
    }

    #[test]
    fn identical_signatures_collapse_to_one() {
        let out = collapse_signatures(vec![sig(&[], Type::VOID), sig(&[], Type::VOID)]);
        assert_eq!(out, vec![sig(&[], Type::VOID)]);
    }

    #[test]
    fn parameter_names_are_ignored() {
        let out = collapse_signatures(vec![
            sig(&[("x", Type::NUMBER)], Type::VOID),
            sig(&[("y", Type::NUMBER)], Type::VOID),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].parameters[0].name, "x");
    }

    #[test]
    fn differing_shapes_survive_in_order() {
        let a = sig(&[("x", Type::NUMBER)], Type::VOID);
        let b = sig(&[("x", Type::STRING)], Type::VOID);
        let c = sig(&[("x", Type::NUMBER)], Type::ANY);
        let d = sig(&[("x", Type::NUMBER), ("y", Type::NUMBER)], Type::VOID);
        let out = collapse_signatures(vec![a.clone(), b.clone(), a.clone(), c.clone(), d.clone(), b.clone()]);
        assert_eq!(out, vec![a, b, c, d]);
    }

    #[test]
    fn comparison_is_structural() {
        let u1 = Type::union([Type::STRING, Type::literal(1i64)]);
        let u2 = Type::union([Type::STRING, Type::literal(1.0)]);
        assert!(same_shape(&sig(&[("a", u1)], Type::NULL), &sig(&[("b", u2)], Type::NULL)));
    }
}
