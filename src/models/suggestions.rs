//! Curated model suggestions shown during setup

/// Model chosen when the setup prompt is left empty
pub const DEFAULT_MODEL: &str = "LibraxisAI/qwen3-8b-MLX-Q5";

/// A suggested model with display metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSuggestion {
    pub model_id: &'static str,
    /// Approximate download size
    pub size: &'static str,
    pub description: &'static str,
}

pub const MODEL_SUGGESTIONS: [ModelSuggestion; 4] = [
    ModelSuggestion {
        model_id: DEFAULT_MODEL,
        size: "~5GB",
        description: "Recommended - Fast & smart",
    },
    ModelSuggestion {
        model_id: "mlx-community/Qwen2.5-7B-Instruct-MLX-4bit",
        size: "~4GB",
        description: "Latest Qwen, very capable",
    },
    ModelSuggestion {
        model_id: "mlx-community/Llama-3.2-3B-Instruct-4bit",
        size: "~2GB",
        description: "Smaller but efficient",
    },
    ModelSuggestion {
        model_id: "mlx-community/Phi-3.5-mini-instruct-4bit",
        size: "~2GB",
        description: "Microsoft's tiny powerhouse",
    },
];

/// Render the suggestions as a fixed-width table
pub fn render_table() -> String {
    let width = MODEL_SUGGESTIONS
        .iter()
        .map(|s| s.model_id.len())
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<width$}  {:<5}  {}\n", "Model", "Size", "Description");
    for s in &MODEL_SUGGESTIONS {
        out.push_str(&format!(
            "{:<width$}  {:<5}  {}\n",
            s.model_id, s.size, s.description
        ));
    }
    out
}
