// All LLM prompt constants for the application pipeline.
// Each constant documents the placeholders it expects.

/// System prompt for search-term normalization — enforces a single-line reply.
pub const TERM_SYSTEM: &str = "You are a job-search assistant. \
    You MUST respond with a single line containing only the cleaned search query. \
    Do NOT include explanations, quotes, or markdown.";

/// Search-term normalization template. Replace `{criterion_text}`.
///
/// The derived term doubles as the search query and the relevance anchor, so
/// seniority and salary qualifiers (which boards match poorly) are stripped.
pub const TERM_PROMPT_TEMPLATE: &str = "\
Extract the core job title / search query from the following job-search wish.
Remove seniority words (junior, middle, senior, lead, principal) and any salary
expectations. Keep the profession and the key technology.

Wish: {criterion_text}";

/// System prompt for relevance verdicts — enforces a bare boolean reply.
pub const RELEVANCE_SYSTEM: &str = "You are a strict job-matching filter. \
    You MUST respond with exactly one word: true or false. \
    Do NOT include any other text.";

/// Relevance verdict template.
/// Replace: {search_term}, {criterion_text}, {posting_title}, {posting_summary}.
pub const RELEVANCE_PROMPT_TEMPLATE: &str = "\
Does the job posting below fit a candidate searching for \"{search_term}\"
(original wish: \"{criterion_text}\")?

Answer true only if the posting is the same profession and a plausible match.
Answer false for adjacent professions, internships, or unrelated roles.

Posting title: {posting_title}
Posting summary:
{posting_summary}";

/// System prompt for cover-letter generation.
pub const LETTER_SYSTEM: &str = "You are an expert cover-letter writer. \
    Write a short, specific, professional cover letter in the language of the posting. \
    Respond with the letter text only — no subject line, no markdown, no commentary. \
    Do NOT invent experience that is not present in the supplied background.";

/// Cover-letter template.
/// Replace: {full_name}, {posting_title}, {employer}, {posting_summary}, {background}.
/// `{background}` is the selected resume's rendered text, or a note that no
/// resume is available.
pub const LETTER_PROMPT_TEMPLATE: &str = "\
Write a cover letter (120-180 words) from {full_name} applying for the position
\"{posting_title}\" at {employer}.

Posting summary:
{posting_summary}

Candidate background:
{background}";

/// System prompt for resume ranking — enforces an identifier-only reply.
pub const RESUME_RANK_SYSTEM: &str = "You are a job-application assistant choosing \
    the best resume for a posting. \
    You MUST respond with exactly one resume id from the provided list. \
    Do NOT include any other text.";

/// Resume ranking template.
/// Replace: {posting_title}, {location}, {salary_band}, {employment},
/// {schedule}, {key_skills}, {resumes}.
/// `{resumes}` is a blank-line-separated list of `id: <id>` blocks followed by
/// each resume's rendered text.
pub const RESUME_RANK_PROMPT_TEMPLATE: &str = "\
Pick the resume that best matches this posting and reply with its id.

Posting: {posting_title}
Location: {location}
Salary: {salary_band}
Employment type: {employment}
Schedule: {schedule}
Key skills: {key_skills}

Resumes:
{resumes}";
