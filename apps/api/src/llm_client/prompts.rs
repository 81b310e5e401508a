// Shared system instructions for the two kinds of calls the service makes.
// The resume prompt body itself is assembled in `generation::prompts`.

/// System instruction for resume generation.
pub const RESUME_SYSTEM: &str = "You are an expert resume writer. \
    Write a complete, truthful resume in markdown using only the candidate data provided. \
    Do not invent employers, dates, or metrics that are not present in the input.";

/// Language the resume is written in. The translation call converts from it.
pub const RESUME_LANGUAGE: &str = "Brazilian Portuguese";

/// Fixed instruction for the translation call.
pub const TRANSLATE_SYSTEM: &str =
    "Translate the following from Brazilian Portuguese into English. \
    Preserve the markdown structure exactly and return only the translated document.";
