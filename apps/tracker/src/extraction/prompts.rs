// Prompt templates for URL extraction. Replace `{url}` before sending.
// Three revisions of the same experiment; `PromptVariant` selects one.

/// First draft: asks the model to visit the page and report what it finds.
pub const VISIT_PROMPT_TEMPLATE: &str = r#"Visit {url} and extract the details of the job listing on that page.

Return a JSON object with the fields "company", "title", "salary" and "source"."#;

/// Field-by-field guidance. The default.
pub const STRUCTURED_PROMPT_TEMPLATE: &str = r#"Parse the job listing at {url} and return a clean JSON object with these fields:
{
  "company": "Company name, without suffixes such as Inc or LLC where possible",
  "role": "Full job title exactly as listed",
  "salary": "Compensation, with a number and a currency. Standard format: $X-$Y, or 'Not disclosed'",
  "source": "Domain name of the listing site (e.g. linkedin.com, indeed.com)"
}

Guidelines:
- Use null for missing information, never an empty string
- Keep text fields concise, under 100 characters when possible
- If salary appears in several formats, prefer the annual figure"#;

/// Structured guidance plus hard output rules. Sent with a JSON-only system prompt.
pub const STRICT_PROMPT_TEMPLATE: &str = r#"Job listing URL: {url}

Return EXACTLY this JSON schema and nothing else:
{
  "company": string | null,
  "role": string | null,
  "location": string | null,
  "salary": string | null,
  "source": string | null
}

HARD RULES:
1. "company": employer name without legal suffixes (Inc, LLC, Ltd)
2. "role": the job title exactly as listed
3. "location": city and region, or "Remote"
4. "salary": "$X-$Y" annual range if known, otherwise null. Never guess a number
5. "source": the domain of the URL, e.g. "linkedin.com"
6. If you do not know a value, use null. Do NOT invent details"#;
