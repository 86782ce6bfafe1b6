//! Input and output shape declarations for each content type

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// The generator variants SabiWriter knows how to prompt for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ContentType
{   #[serde(rename = "instagram")]
    InstagramBio
  , #[serde(rename = "whatsapp")]
    WhatsAppDescription
  , #[serde(rename = "tagline")]
    Tagline
  , #[serde(rename = "product")]
    ProductDescription
  , #[serde(rename = "twitter")]
    TwitterPost
  , #[serde(rename = "facebook")]
    FacebookPost
}

impl ContentType
{   pub const ALL: [ContentType; 6] =
    [   ContentType::InstagramBio
      , ContentType::WhatsAppDescription
      , ContentType::Tagline
      , ContentType::ProductDescription
      , ContentType::TwitterPost
      , ContentType::FacebookPost
    ];

    /// Generator id used in the settings record
    pub fn id(&self) -> &'static str
    {   match self
        {   ContentType::InstagramBio => "instagram"
          , ContentType::WhatsAppDescription => "whatsapp"
          , ContentType::Tagline => "tagline"
          , ContentType::ProductDescription => "product"
          , ContentType::TwitterPost => "twitter"
          , ContentType::FacebookPost => "facebook"
        }
    }

    /// Label stored on history items
    pub fn label(&self) -> &'static str
    {   match self
        {   ContentType::InstagramBio => "Instagram"
          , ContentType::WhatsAppDescription => "WhatsApp"
          , ContentType::Tagline => "Tagline"
          , ContentType::ProductDescription => "Product Description"
          , ContentType::TwitterPost => "Twitter Post"
          , ContentType::FacebookPost => "Facebook Post"
        }
    }
}

impl fmt::Display for ContentType
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "{}", self.label())
    }
}

impl FromStr for ContentType
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   ContentType::ALL
          .iter()
          .copied()
          .find(|ct| ct.id() == s)
          .ok_or_else(|| {
            crate::error::Error::InvalidConfiguration(
              format!("unknown content type: {}", s)
            )
          })
    }
}

/// Style directive injected into every prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum Tone
{   #[default]
    Nigerian
  , Professional
  , Playful
  , Witty
  , Inspirational
}

impl Tone
{   pub const ALL: [Tone; 5] =
    [   Tone::Nigerian
      , Tone::Professional
      , Tone::Playful
      , Tone::Witty
      , Tone::Inspirational
    ];

    pub fn as_str(&self) -> &'static str
    {   match self
        {   Tone::Nigerian => "Nigerian"
          , Tone::Professional => "Professional"
          , Tone::Playful => "Playful"
          , Tone::Witty => "Witty"
          , Tone::Inspirational => "Inspirational"
        }
    }
}

impl fmt::Display for Tone
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tone
{   type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   Tone::ALL
          .iter()
          .copied()
          .find(|t| t.as_str() == s)
          .ok_or_else(|| {
            crate::error::Error::InvalidConfiguration(
              format!("unknown tone: {}", s)
            )
          })
    }
}

/// Semantic type of an input field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind
{   Text
  , Bool
  , Enum
}

/// One declared input field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec
{   /// Wire name of the field (camelCase)
    pub name: &'static str
  , pub kind: FieldKind
  , /// Minimum trimmed length in characters; zero for non-text
    pub min_len: usize
  , /// Message reported when the constraint fails
    pub message: &'static str
}

/// Input and output shape for one content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema
{   pub input_fields: &'static [FieldSpec]
  , /// Name of the single string field the model must return
    pub output_field: &'static str
  , pub output_description: &'static str
}

impl Schema
{   /// Look up a declared input field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec>
    {   self.input_fields.iter().find(|f| f.name == name)
    }
}

const fn text(
  name: &'static str
, min_len: usize
, message: &'static str
) -> FieldSpec
{   FieldSpec { name, kind: FieldKind::Text, min_len, message }
}

const TONE: FieldSpec = FieldSpec
{   name: "tone"
  , kind: FieldKind::Enum
  , min_len: 0
  , message: "Tone is required."
};

const INCLUDE_EMOJIS: FieldSpec = FieldSpec
{   name: "includeEmojis"
  , kind: FieldKind::Bool
  , min_len: 0
  , message: ""
};

static INSTAGRAM_BIO: Schema = Schema
{   input_fields: &[
      text("businessName", 2, "Business name is required.")
    , text("businessDescription", 10, "Please provide a brief description.")
    , text("valueProposition", 5, "Value proposition is required.")
    , text("callToAction", 3, "Call to action is required.")
    , TONE
    , INCLUDE_EMOJIS
    ]
  , output_field: "bio"
  , output_description: "The generated Instagram bio."
};

static WHATSAPP_DESCRIPTION: Schema = Schema
{   input_fields: &[
      text("businessName", 2, "Business name is required.")
    , text("industry", 3, "Industry is required.")
    , TONE
    , INCLUDE_EMOJIS
    ]
  , output_field: "description"
  , output_description: "The generated WhatsApp business description."
};

static TAGLINE: Schema = Schema
{   input_fields: &[
      text("businessDescription", 10, "Please provide a brief description.")
    , TONE
    , INCLUDE_EMOJIS
    ]
  , output_field: "tagline"
  , output_description:
      "A catchy and memorable tagline of 3-7 words that encapsulates the business's essence."
};

static PRODUCT_DESCRIPTION: Schema = Schema
{   input_fields: &[
      text("productName", 2, "Product name is required.")
    , text("productFeatures", 10,
        "Please provide some features or a brief description.")
    , TONE
    , INCLUDE_EMOJIS
    ]
  , output_field: "description"
  , output_description: "The generated product description."
};

static TWITTER_POST: Schema = Schema
{   input_fields: &[
      text("topic", 10, "Please provide a topic for the post.")
    , TONE
    , INCLUDE_EMOJIS
    ]
  , output_field: "post"
  , output_description: "The generated Twitter post."
};

static FACEBOOK_POST: Schema = Schema
{   input_fields: &[
      text("topic", 10, "Please provide a topic for the post.")
    , TONE
    , INCLUDE_EMOJIS
    ]
  , output_field: "post"
  , output_description: "The generated Facebook post."
};

/// Declared input/output shape of a content type
pub fn get_schema(content_type: ContentType) -> &'static Schema
{   match content_type
    {   ContentType::InstagramBio => &INSTAGRAM_BIO
      , ContentType::WhatsAppDescription => &WHATSAPP_DESCRIPTION
      , ContentType::Tagline => &TAGLINE
      , ContentType::ProductDescription => &PRODUCT_DESCRIPTION
      , ContentType::TwitterPost => &TWITTER_POST
      , ContentType::FacebookPost => &FACEBOOK_POST
    }
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn every_schema_carries_tone_and_emojis()
    {   for ct in ContentType::ALL
        {   let schema = get_schema(ct);
            assert_eq!(schema.field("tone").map(|f| f.kind), Some(FieldKind::Enum));
            assert_eq!(
              schema.field("includeEmojis").map(|f| f.kind),
              Some(FieldKind::Bool)
            );
        }
    }

    #[test]
    fn output_fields()
    {   assert_eq!(get_schema(ContentType::InstagramBio).output_field, "bio");
        assert_eq!(get_schema(ContentType::Tagline).output_field, "tagline");
        assert_eq!(get_schema(ContentType::TwitterPost).output_field, "post");
        assert_eq!(
          get_schema(ContentType::ProductDescription).output_field,
          "description"
        );
    }

    #[test]
    fn instagram_min_lengths()
    {   let schema = get_schema(ContentType::InstagramBio);
        assert_eq!(schema.field("businessName").map(|f| f.min_len), Some(2));
        assert_eq!(schema.field("businessDescription").map(|f| f.min_len), Some(10));
    }

    #[test]
    fn parse_ids_and_tones()
    {   for ct in ContentType::ALL
        {   assert_eq!(ct.id().parse::<ContentType>(), Ok(ct));
        }
        assert!("linkedin".parse::<ContentType>().is_err());
        assert_eq!("Witty".parse::<Tone>(), Ok(Tone::Witty));
        assert!("witty".parse::<Tone>().is_err());
        assert_eq!(Tone::default(), Tone::Nigerian);
    }
}
