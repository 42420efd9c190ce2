pub mod task_parser;
pub mod task_serializer;

pub use task_parser::{is_task_line, parse_task_line, parse_title_and_tags};
pub use task_serializer::{serialize_task, serialize_with_column};
