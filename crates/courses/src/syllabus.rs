//! Syllabus templates for auto-populating course modules.
//!
//! New courses are seeded with a fixed topic set selected by keywords in the
//! course name: the full advanced curriculum for advanced/retraining/
//! coordinator courses, the short normative set for administrative and basic
//! ones, and the first four advanced topics otherwise.

use alturas_core::CourseId;

use crate::module::Module;

/// A syllabus topic: title + short description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicTemplate {
    pub title: &'static str,
    pub description: &'static str,
}

const ADVANCED_TOPICS: [TopicTemplate; 7] = [
    TopicTemplate {
        title: "Marco Legal (Res. 4272/2021)",
        description: "Análisis de la resolución, obligaciones empleador/trabajador, roles y responsabilidades.",
    },
    TopicTemplate {
        title: "Identificación de Peligros",
        description: "Peligros y riesgos asociados al trabajo en alturas. Medidas de prevención y protección.",
    },
    TopicTemplate {
        title: "Permisos de Trabajo",
        description: "Diligenciamiento del permiso, listas de chequeo y análisis de riesgo (ARO/ATS).",
    },
    TopicTemplate {
        title: "Equipos de Protección Personal (EPP)",
        description: "Selección, uso, inspección y mantenimiento de arneses, cascos y eslingas.",
    },
    TopicTemplate {
        title: "Sistemas de Ingeniería",
        description: "Líneas de vida, puntos de anclaje, barandas y redes de seguridad.",
    },
    TopicTemplate {
        title: "Procedimientos de Rescate",
        description: "Plan de emergencias, autorescate y rescate asistido básico.",
    },
    TopicTemplate {
        title: "Primeros Auxilios Básicos",
        description: "Atención inicial a trauma por suspensión y lesiones comunes.",
    },
];

const BASIC_TOPICS: [TopicTemplate; 3] = [
    TopicTemplate {
        title: "Introducción a la Normativa",
        description: "Aspectos generales de la Resolución 4272 de 2021.",
    },
    TopicTemplate {
        title: "Responsabilidad Civil y Penal",
        description: "Implicaciones legales de los accidentes de trabajo.",
    },
    TopicTemplate {
        title: "Gestión de Riesgos",
        description: "Conceptos básicos de identificación y control de riesgos.",
    },
];

/// Pick the topic set for a course name.
pub fn topics_for(course_name: &str) -> &'static [TopicTemplate] {
    let upper = course_name.to_uppercase();

    if ["AVANZADO", "ENTRENAMIENTO", "COORDINADOR"]
        .iter()
        .any(|kw| upper.contains(kw))
    {
        &ADVANCED_TOPICS
    } else if ["ADMINISTRATIVO", "BASICO", "BÁSICO"]
        .iter()
        .any(|kw| upper.contains(kw))
    {
        &BASIC_TOPICS
    } else {
        &ADVANCED_TOPICS[..4]
    }
}

/// Build the seeded module list for a freshly created course.
///
/// Order indexes are 1-based.
pub fn seed_modules(course_id: CourseId, course_name: &str) -> Vec<Module> {
    topics_for(course_name)
        .iter()
        .enumerate()
        .map(|(idx, topic)| {
            Module::new(course_id, topic.title, (idx as u32) + 1)
                .with_description(topic.description)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advanced_keywords_pick_the_full_curriculum() {
        assert_eq!(topics_for("Trabajo en Alturas Avanzado").len(), 7);
        assert_eq!(topics_for("Reentrenamiento Anual").len(), 7);
        assert_eq!(topics_for("Coordinador de Alturas").len(), 7);
    }

    #[test]
    fn basic_keywords_pick_the_short_set() {
        assert_eq!(topics_for("Curso Básico Operativo").len(), 3);
        assert_eq!(topics_for("Nivel BASICO").len(), 3);
        assert_eq!(topics_for("Personal Administrativo").len(), 3);
    }

    #[test]
    fn unmatched_names_get_the_first_four_advanced_topics() {
        let topics = topics_for("Espacios Confinados");
        assert_eq!(topics.len(), 4);
        assert_eq!(topics[0].title, "Marco Legal (Res. 4272/2021)");
    }

    #[test]
    fn seeded_modules_are_ordered_from_one() {
        let course_id = CourseId::new();
        let modules = seed_modules(course_id, "Curso Básico Operativo");

        assert_eq!(modules.len(), 3);
        for (idx, module) in modules.iter().enumerate() {
            assert_eq!(module.order_index, (idx as u32) + 1);
            assert_eq!(module.course_id, course_id);
            assert!(module.description.is_some());
        }
    }
}
