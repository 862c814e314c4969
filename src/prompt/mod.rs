//! Prompt composition: fixed production-brief instruction plus the user's idea.

use crate::error::{BriefError, Result};

/// Instruction sent ahead of every idea. Asks for the thirteen-field JSON brief.
pub const SYSTEM_PROMPT: &str = r#"
Tu es un ingénieur du son professionnel et beatmaker.
Génère un BRIEF MUSICAL ULTRA COMPLET pour production audio et beatmaking.
Réponds UNIQUEMENT en JSON VALIDE (aucun markdown, aucun ```).
Format EXACT :
{
  "style": "",
  "bpm": "",
  "key": "",
  "ambiance": "",
  "structure": "",
  "instruments": "",
  "drums_patterns": "",
  "presets_plugins": "",
  "mix_tips": "",
  "mastering_tips": "",
  "effects": "",
  "automation_tips": "",
  "arrangement_guide": ""
}
Exigences :
- très technique
- inclure les presets exacts pour Serum, Kontakt, RC20, Valhalla, etc.
- tempo précis
- gamme musicale et accords
- patterns de batterie détaillés
- conseils mixage pro
- conseils mastering pro
- effets (reverb, delay, chorus, saturation)
- automation pour dynamique et mouvement
- guide d'arrangement avec positions des instruments
"#;

/// Label placed before the user's idea.
pub const IDEA_LABEL: &str = "Idée utilisateur : ";

/// Text sent by the key/quota canary.
pub const CANARY_TEXT: &str = "Test clé et quota";

/// Ordered text segments sent to the provider as one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    segments: Vec<String>,
}

impl Prompt {
    /// Build the brief prompt for an idea. Blank ideas are rejected.
    pub fn compose(idea: &str) -> Result<Self> {
        if idea.trim().is_empty() {
            return Err(BriefError::validation("Missing idea"));
        }
        Ok(Self {
            segments: vec![SYSTEM_PROMPT.to_string(), format!("{IDEA_LABEL}{idea}")],
        })
    }

    /// Single-segment prompt used to check the key and quota.
    pub fn canary() -> Self {
        Self {
            segments: vec![CANARY_TEXT.to_string()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Gemini `contents` payload for this prompt.
    pub fn to_request_body(&self) -> serde_json::Value {
        let parts: Vec<serde_json::Value> = self
            .segments
            .iter()
            .map(|text| serde_json::json!({ "text": text }))
            .collect();
        serde_json::json!({ "contents": [{ "parts": parts }] })
    }
}
