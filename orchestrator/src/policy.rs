//! Domain policy: the system prompt that pins the assistant to dental care
//! and carries the fixed refusal sentence for everything else.

/// Database schema description advertised to the reasoning step so it can
/// write queries against the right tables.
const TABLE_SCHEMA: &str = "\
The database schema is as follows:

Table: patients
 - id (serial, primary key)
 - name (VARCHAR(100), NOT NULL)
 - email (VARCHAR(100), UNIQUE)
 - phone (VARCHAR(20))
 - created_at (TIMESTAMP, defaults to CURRENT_TIMESTAMP)

Table: appointments
 - id (serial, primary key)
 - patient_id (integer, NOT NULL, foreign key referencing patients(id))
 - appointment_date (DATE, NOT NULL)
 - appointment_time (TIME, NOT NULL)
 - notes (text)
 - created_at (TIMESTAMP, defaults to CURRENT_TIMESTAMP)";

/// Default refusal sentence for out-of-domain requests.
pub const DEFAULT_REFUSAL: &str = "I only handle dental-related queries.";

/// The declared subject area and its refusal text. The policy is a hard gate
/// expressed through the system prompt, not a tool choice: out-of-domain
/// messages must get exactly the refusal sentence, never a tool call.
#[derive(Debug, Clone)]
pub struct DomainPolicy {
    refusal_message: String,
}

impl Default for DomainPolicy {
    fn default() -> Self {
        Self {
            refusal_message: DEFAULT_REFUSAL.to_string(),
        }
    }
}

impl DomainPolicy {
    /// Policy with a custom refusal sentence.
    pub fn with_refusal(refusal_message: impl Into<String>) -> Self {
        Self {
            refusal_message: refusal_message.into(),
        }
    }

    /// The fixed refusal sentence.
    pub fn refusal_message(&self) -> &str {
        &self.refusal_message
    }

    /// Full system prompt: tool guidance, schema, and domain rules.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are an AI assistant for a dental clinic with access to two tools:\n\
             \n\
             1) sql_query: for running SQL queries on the clinic's PostgreSQL database.\n\
             {schema}\n\
             \n\
             2) web_search: for answering general dental questions from the web \
             (e.g. causes of dental diseases, cures, tips, prevention).\n\
             \n\
             Rules:\n\
             - If the user's request contains or references SQL (SELECT, INSERT, UPDATE, etc.) \
             or asks about patients or appointments, call sql_query.\n\
             - If the user wants general dental information, call web_search.\n\
             - If the question is unrelated to dental care or the clinic database, politely \
             refuse with exactly: \"{refusal}\"\n\
             - Return only final results (query results, search results, or the refusal). \
             No extra commentary.",
            schema = TABLE_SCHEMA,
            refusal = self.refusal_message,
        )
    }
}
