//! Rule tables that turn the free-text `Resultado` of a lead into its
//! simplified status and its attendance flag.
//!
//! The two tables are evaluated independently over the same lowercased text
//! and do not share an order: a "No Show - asistió tarde" lead is classified
//! as No Show by [`ESTADO_RULES`] and is not an attendance under
//! [`ASISTENCIA_RULES`]. Rescheduled leads never count as attendance.

use crate::schema::EstadoSimple;

/// A predicate over the lowercased `Resultado` text.
pub type TextPredicate = fn(&str) -> bool;

/// Status rules, first match wins. Falls back to [`EstadoSimple::OtroPendiente`].
pub const ESTADO_RULES: &[(TextPredicate, EstadoSimple)] = &[
    (|t: &str| t.contains("venta"), EstadoSimple::Venta),
    (|t: &str| t.contains("no show"), EstadoSimple::NoShow),
    (|t: &str| t.contains("descalificado"), EstadoSimple::Descalificado),
    (|t: &str| t.contains("seguimiento"), EstadoSimple::Seguimiento),
    (
        |t: &str| t.contains("re-agendado") || t.contains("reagendado"),
        EstadoSimple::ReAgendado,
    ),
];

/// Attendance rules, first match wins. Falls back to `false`.
pub const ASISTENCIA_RULES: &[(TextPredicate, bool)] = &[
    (|t: &str| t.contains("venta"), true),
    (|t: &str| t.contains("seguimiento"), true),
    (|t: &str| t.contains("asistió") && !t.contains("no show"), true),
];

fn first_match<T: Copy>(rules: &[(TextPredicate, T)], text: &str, fallback: T) -> T {
    rules
        .iter()
        .find(|(predicate, _)| predicate(text))
        .map(|(_, result)| *result)
        .unwrap_or(fallback)
}

pub fn classify_estado(resultado: &str) -> EstadoSimple {
    first_match(
        ESTADO_RULES,
        &resultado.to_lowercase(),
        EstadoSimple::OtroPendiente,
    )
}

pub fn is_asistencia(resultado: &str) -> bool {
    first_match(ASISTENCIA_RULES, &resultado.to_lowercase(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estado_basic_categories() {
        assert_eq!(classify_estado("Venta cerrada"), EstadoSimple::Venta);
        assert_eq!(classify_estado("NO SHOW"), EstadoSimple::NoShow);
        assert_eq!(
            classify_estado("Lead descalificado por presupuesto"),
            EstadoSimple::Descalificado
        );
        assert_eq!(
            classify_estado("En Seguimiento"),
            EstadoSimple::Seguimiento
        );
        assert_eq!(classify_estado("Re-Agendado"), EstadoSimple::ReAgendado);
        assert_eq!(classify_estado("reagendado jueves"), EstadoSimple::ReAgendado);
        assert_eq!(classify_estado("Pendiente"), EstadoSimple::OtroPendiente);
        assert_eq!(classify_estado(""), EstadoSimple::OtroPendiente);
    }

    #[test]
    fn test_estado_priority_order() {
        assert_eq!(classify_estado("Venta re-agendado"), EstadoSimple::Venta);
        assert_eq!(
            classify_estado("No show, seguimiento por whatsapp"),
            EstadoSimple::NoShow
        );
        assert_eq!(
            classify_estado("Descalificado tras seguimiento"),
            EstadoSimple::Descalificado
        );
    }

    #[test]
    fn test_asistencia_rules() {
        assert!(is_asistencia("Venta cerrada"));
        assert!(is_asistencia("Seguimiento"));
        assert!(is_asistencia("Asistió, no compró"));
        assert!(is_asistencia("ASISTIÓ"));
        assert!(!is_asistencia("No Show - Asistió tarde"));
        assert!(!is_asistencia("No Show"));
        assert!(!is_asistencia("Re-Agendado"));
        assert!(!is_asistencia("Descalificado"));
        assert!(!is_asistencia("Pendiente"));
    }

    #[test]
    fn test_asistencia_independent_of_estado() {
        let resultado = "No Show - Asistió tarde";
        assert_eq!(classify_estado(resultado), EstadoSimple::NoShow);
        assert!(!is_asistencia(resultado));

        // Sale beats the negative clause.
        let resultado = "Venta tras no show";
        assert_eq!(classify_estado(resultado), EstadoSimple::Venta);
        assert!(is_asistencia(resultado));

        // Attended without a matching status word.
        let resultado = "Asistió, lo pensará";
        assert_eq!(classify_estado(resultado), EstadoSimple::OtroPendiente);
        assert!(is_asistencia(resultado));
    }

    #[test]
    fn test_estado_is_always_a_known_category() {
        for text in ["", "???", "venta", "no show", "asistió", "RE-AGENDADO"] {
            assert!(EstadoSimple::ALL.contains(&classify_estado(text)));
        }
    }
}
