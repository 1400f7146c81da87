use std::mem;

use crate::error::{
   ConfigError,
   Result,
};

/// Escapes braces so `text` renders verbatim when parsed as a [`Template`].
#[must_use]
pub fn escape(text: &str) -> String {
   text.replace('{', "{{").replace('}', "}}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
   Literal(String),
   Original,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
   Automatic,
   Manual,
}

/// A message template whose `{}` or `{0}` fields are substituted with the
/// message of the original exception. `{{` and `}}` stand for literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
   segments: Vec<Segment>,
}

impl Template {
   pub fn parse(template: &str) -> Result<Self> {
      let invalid = |reason| {
         ConfigError::Template {
            template: template.to_owned(),
            reason,
         }
      };

      let mut segments = Vec::new();
      let mut literal = String::new();
      let mut numbering = None;

      let mut chars = template.chars().peekable();
      while let Some(c) = chars.next() {
         match c {
            '{' if chars.next_if_eq(&'{').is_some() => literal.push('{'),
            '}' if chars.next_if_eq(&'}').is_some() => literal.push('}'),

            '}' => return Err(invalid("single '}' encountered")),

            '{' => {
               let mut field = String::new();
               loop {
                  match chars.next() {
                     Some('}') => break,
                     Some('{') => return Err(invalid("unexpected '{' in field")),
                     Some(c) => field.push(c),
                     None => return Err(invalid("single '{' encountered")),
                  }
               }

               let field_numbering = match &*field {
                  "" => Numbering::Automatic,
                  "0" => Numbering::Manual,
                  _ if field.contains([':', '!']) => {
                     return Err(invalid("format specs and conversions are not supported"));
                  },
                  _ => return Err(invalid("only the original message can be substituted")),
               };

               match numbering {
                  None => numbering = Some(field_numbering),

                  Some(Numbering::Automatic) if field_numbering == Numbering::Automatic => {
                     return Err(invalid("only one automatic field is allowed"));
                  },

                  Some(existing) if existing != field_numbering => {
                     return Err(invalid("cannot mix automatic and manual field numbering"));
                  },

                  Some(_) => {},
               }

               if !literal.is_empty() {
                  segments.push(Segment::Literal(mem::take(&mut literal)));
               }
               segments.push(Segment::Original);
            },

            c => literal.push(c),
         }
      }

      if !literal.is_empty() {
         segments.push(Segment::Literal(literal));
      }

      Ok(Self { segments })
   }

   /// Renders the template, substituting every field with `original`.
   #[must_use]
   pub fn render(&self, original: &str) -> String {
      let mut rendered = String::new();

      for segment in &self.segments {
         match segment {
            Segment::Literal(literal) => rendered.push_str(literal),
            Segment::Original => rendered.push_str(original),
         }
      }

      rendered
   }
}
