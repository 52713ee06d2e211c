//! Static domain knowledge about Colombian severance pay.
//!
//! A small corpus of topics, each with trigger keywords and a canned answer.
//! The built-in corpus can be replaced with a YAML file:
//!
//! ```yaml
//! topics:
//!   - id: definicion
//!     title: Qué son las cesantías
//!     keywords: ["que son", "definicion"]
//!     answer: Las cesantías son...
//! ```

use cesantias_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::matcher::Question;

/// One answerable topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeTopic {
    pub id: String,
    pub title: String,
    /// Vocabulary terms, in the matcher's word / `stem*` / phrase syntax
    pub keywords: Vec<String>,
    pub answer: String,
}

/// Most topics combined into one answer.
const MAX_COMBINED_TOPICS: usize = 2;

/// Answer chosen for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeAnswer {
    /// Ids of the topics answered, in corpus order; empty for the fallback
    pub topics: Vec<String>,
    pub text: String,
    /// Keyword matches of the best topic
    pub score: usize,
}

/// The knowledge corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub topics: Vec<KnowledgeTopic>,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnowledgeBase {
    /// Corpus shipped with the agent.
    pub fn builtin() -> Self {
        Self {
            topics: vec![
                topic(
                    "definicion",
                    "Qué son las cesantías",
                    &[
                        "que son",
                        "que es",
                        "definicion",
                        "significa*",
                        "concepto",
                        "para que sirv*",
                        "prestacion*",
                    ],
                    "Las cesantías son una prestación social a cargo del empleador \
                     equivalente a un mes de salario por cada año de trabajo, o \
                     proporcional por fracción de año. Su propósito es proteger al \
                     trabajador cuando queda cesante y apoyar gastos de vivienda y \
                     educación.",
                ),
                topic(
                    "pago",
                    "Cuándo se pagan las cesantías",
                    &[
                        "cuando",
                        "pag*",
                        "fecha*",
                        "plazo*",
                        "consign*",
                        "fondo*",
                        "febrero",
                    ],
                    "Las cesantías se liquidan al 31 de diciembre de cada año y el \
                     empleador debe consignarlas en el fondo de cesantías elegido por \
                     el trabajador a más tardar el 14 de febrero del año siguiente. \
                     Si el contrato termina, se pagan directamente al trabajador con \
                     la liquidación final.",
                ),
                topic(
                    "intereses",
                    "Intereses sobre las cesantías",
                    &["interes*", "porcentaje", "doce por ciento", "enero"],
                    "El empleador debe pagar al trabajador intereses del 12% anual \
                     sobre el saldo de cesantías acumulado al 31 de diciembre, \
                     proporcional al tiempo trabajado. Se pagan directamente al \
                     trabajador a más tardar el 31 de enero. Si no se pagan a tiempo, \
                     se debe una sanción igual al valor de los intereses.",
                ),
                topic(
                    "calculo",
                    "Cómo se calculan las cesantías",
                    &[
                        "calcul*",
                        "liquid*",
                        "formula",
                        "como se obtien*",
                        "salario base",
                        "dias trabajados",
                    ],
                    "Las cesantías se calculan como salario mensual por días \
                     trabajados dividido entre 360. Si el salario es variable se \
                     toma el promedio del último año, y el auxilio de transporte \
                     hace parte de la base para quienes lo reciben.",
                ),
                topic(
                    "retiro",
                    "Retiro de cesantías",
                    &[
                        "retir*",
                        "sacar",
                        "vivienda",
                        "educacion",
                        "estudio*",
                        "usar",
                        "usos",
                        "desemple*",
                    ],
                    "Las cesantías se pueden retirar al terminar el contrato de \
                     trabajo, o de forma parcial durante la relación laboral para \
                     compra, construcción o mejora de vivienda, pago de créditos \
                     hipotecarios y educación superior del trabajador, su cónyuge o \
                     sus hijos.",
                ),
                topic(
                    "derecho",
                    "Quién tiene derecho a cesantías",
                    &[
                        "derecho",
                        "quien*",
                        "aplica*",
                        "salario integral",
                        "contrato*",
                        "prestacion de servicios",
                    ],
                    "Tienen derecho a cesantías todos los trabajadores con contrato \
                     laboral, sea a término fijo o indefinido, incluso si trabajan \
                     medio tiempo. No aplican para quienes devengan salario integral \
                     ni para contratistas por prestación de servicios.",
                ),
            ],
        }
    }

    /// Parse a corpus from YAML and validate it.
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let base: Self = serde_yaml::from_str(content)
            .map_err(|e| AppError::Knowledge(format!("Invalid knowledge corpus: {}", e)))?;
        base.validate()?;
        Ok(base)
    }

    /// Load a corpus file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Knowledge(format!(
                "Failed to read knowledge corpus {}: {}",
                path.display(),
                e
            ))
        })?;

        let base = Self::from_yaml_str(&content)?;
        tracing::info!(
            "Loaded {} knowledge topics from {}",
            base.topics.len(),
            path.display()
        );
        Ok(base)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.topics.is_empty() {
            return Err(AppError::Knowledge("Knowledge corpus has no topics".to_string()));
        }

        let mut seen = HashSet::new();
        for (i, topic) in self.topics.iter().enumerate() {
            if topic.id.trim().is_empty() {
                return Err(AppError::Knowledge(format!("Topic {} has no id", i + 1)));
            }
            if !seen.insert(topic.id.as_str()) {
                return Err(AppError::Knowledge(format!("Duplicate topic id: {}", topic.id)));
            }
            if topic.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(AppError::Knowledge(format!("Topic {} has no keywords", topic.id)));
            }
            if topic.answer.trim().is_empty() {
                return Err(AppError::Knowledge(format!("Topic {} has no answer", topic.id)));
            }
        }

        Ok(())
    }

    /// Best-matching topics for a question, or the fallback.
    ///
    /// A question often asks two things at once ("qué son y cuándo se
    /// pagan"), so every topic scoring within one keyword of the best is
    /// answered too, up to [`MAX_COMBINED_TOPICS`]. Higher scores win a
    /// place first, then earlier topics; the answers keep corpus order.
    pub fn answer(&self, question: &Question) -> KnowledgeAnswer {
        let mut scored: Vec<(usize, &KnowledgeTopic, usize)> = self
            .topics
            .iter()
            .enumerate()
            .map(|(i, topic)| (i, topic, question.count_matches(&topic.keywords)))
            .filter(|(_, _, score)| *score > 0)
            .collect();

        let best = scored.iter().map(|(_, _, score)| *score).max().unwrap_or(0);
        if best == 0 {
            return KnowledgeAnswer {
                topics: Vec::new(),
                text: self.fallback(),
                score: 0,
            };
        }

        let threshold = best.saturating_sub(1).max(1);
        scored.retain(|(_, _, score)| *score >= threshold);
        scored.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0)));
        scored.truncate(MAX_COMBINED_TOPICS);
        scored.sort_by_key(|(i, _, _)| *i);

        KnowledgeAnswer {
            topics: scored.iter().map(|(_, t, _)| t.id.clone()).collect(),
            text: scored
                .iter()
                .map(|(_, t, _)| t.answer.as_str())
                .collect::<Vec<_>>()
                .join("\n\n"),
            score: best,
        }
    }

    fn fallback(&self) -> String {
        let titles: Vec<&str> = self.topics.iter().map(|t| t.title.as_str()).collect();
        format!(
            "No tengo información específica sobre esa pregunta. Puedo explicarte: {}. \
             También puedo consultar los datos de cesantías por número de documento.",
            titles.join("; ")
        )
    }
}

fn topic(id: &str, title: &str, keywords: &[&str], answer: &str) -> KnowledgeTopic {
    KnowledgeTopic {
        id: id.to_string(),
        title: title.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        answer: answer.to_string(),
    }
}
