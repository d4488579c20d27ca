//! Fixed assistant texts
//!
//! The interview is conducted in Spanish; these strings are part of the
//! product surface and are matched verbatim by clients.

use super::Step;

pub const ASK_RESPONSIBILITIES: &str = "Para empezar, dime entre 2 y 5 RESPONSABILIDADES principales del puesto o persona. \
Usa viñetas o frases cortas (ej.: '- Coordinación de equipo').";

pub const ASK_TASKS: &str = "Perfecto. Ahora, para cada responsabilidad, lista entre 3 y 7 TAREAS concretas y accionables. \
Puedes responder en formato:\n\
- Responsabilidad X:\n  - Tarea 1\n  - Tarea 2\n- Responsabilidad Y: ...";

pub const REVIEW: &str = "Revisión: así queda el resumen. ¿Deseas añadir/corregir algo?\n\
- Responsabilidades y tareas almacenadas.";

pub const REFORMULATE_RESPONSIBILITIES: &str =
    "No identifiqué responsabilidades. Reformula con viñetas, por favor.";

pub const USE_TASK_BULLETS: &str =
    "No pude extraer tareas. Usa '- Tarea ...' bajo cada responsabilidad.";

/// Prompt that asks for whatever the given step is waiting on
pub fn for_step(step: Step) -> &'static str {
    match step {
        Step::CollectResponsibilities => ASK_RESPONSIBILITIES,
        Step::CollectTasks => ASK_TASKS,
        Step::Review => REVIEW,
    }
}
