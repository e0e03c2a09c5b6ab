//! Database command operations
//!
//! A command is a document sent to a named database. Operations build the
//! document from typed options and delegate execution entirely to the
//! generic wrapped-command helpers; they carry no logic of their own.

use async_trait::async_trait;
use serde_json::{Map, Value};

use ps_core::CommandError;

/// A command document, keyed in insertion order
pub type Document = Map<String, Value>;

/// Blocking write access to a server connection
pub trait WriteBinding {
    /// Execute a command against a database, returning the server's reply
    fn run_command(&mut self, database: &str, command: &Document) -> Result<Document, CommandError>;
}

/// Asynchronous session able to execute commands
#[async_trait]
pub trait Session: Send + Sync {
    /// Execute a command against a database, returning the server's reply
    async fn run_command(
        &self,
        database: &str,
        command: &Document,
    ) -> Result<Document, CommandError>;
}

/// Execute a command for its side effect, discarding the reply
fn execute_wrapped_command(
    database: &str,
    command: &Document,
    binding: &mut dyn WriteBinding,
) -> Result<(), CommandError> {
    binding.run_command(database, command).map(|_| ())
}

/// Async counterpart of [`execute_wrapped_command`]
async fn execute_wrapped_command_async(
    database: &str,
    command: &Document,
    session: &dyn Session,
) -> Result<(), CommandError> {
    session.run_command(database, command).await.map(|_| ())
}

/// Typed options for creating a collection
#[derive(Debug, Clone)]
pub struct CreateCollectionOptions {
    collection_name: String,
    capped: bool,
    size_in_bytes: Option<i64>,
    max_documents: Option<i64>,
    auto_index: bool,
}

impl CreateCollectionOptions {
    pub fn new(collection_name: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            capped: false,
            size_in_bytes: None,
            max_documents: None,
            auto_index: true,
        }
    }

    /// Cap the collection at a fixed size in bytes
    pub fn capped(mut self, size_in_bytes: i64) -> Self {
        self.capped = true;
        self.size_in_bytes = Some(size_in_bytes);
        self
    }

    /// Limit the number of documents (capped collections only)
    pub fn max_documents(mut self, max: i64) -> Self {
        self.max_documents = Some(max);
        self
    }

    pub fn auto_index(mut self, auto_index: bool) -> Self {
        self.auto_index = auto_index;
        self
    }

    /// Build the command document, fields in declaration order
    pub fn as_document(&self) -> Document {
        let mut document = Document::new();
        document.insert(
            "create".to_string(),
            Value::from(self.collection_name.clone()),
        );
        if self.capped {
            document.insert("capped".to_string(), Value::from(true));
            if let Some(size) = self.size_in_bytes {
                document.insert("size".to_string(), Value::from(size));
            }
            if let Some(max) = self.max_documents {
                document.insert("max".to_string(), Value::from(max));
            }
        }
        document.insert("autoIndexId".to_string(), Value::from(self.auto_index));
        document
    }
}

/// Operation that creates a collection in a database.
///
/// Thin wrapper: builds the command document and hands it to the generic
/// execution helpers, synchronously over a binding or asynchronously over
/// a session. Failures surface as [`CommandError`], never swallowed.
pub struct CreateCollectionOperation {
    database_name: String,
    options: CreateCollectionOptions,
}

impl CreateCollectionOperation {
    pub fn new(database_name: impl Into<String>, options: CreateCollectionOptions) -> Self {
        Self {
            database_name: database_name.into(),
            options,
        }
    }

    /// Execute synchronously over a write binding
    pub fn execute(&self, binding: &mut dyn WriteBinding) -> Result<(), CommandError> {
        execute_wrapped_command(&self.database_name, &self.options.as_document(), binding)
    }

    /// Execute asynchronously over a session; the returned future is the
    /// completion handle
    pub async fn execute_async(&self, session: &dyn Session) -> Result<(), CommandError> {
        execute_wrapped_command_async(&self.database_name, &self.options.as_document(), session)
            .await
    }
}
