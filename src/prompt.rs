//! Prompt templates for every content type
//!
//! All six generators share one layout. A `ContentProfile` carries the
//! per-type wording (role, task, platform limits, emoji phrasing) and
//! `build_prompt` renders it together with the request values.

use std::fmt::Write;
use log::trace;

use crate::request::{ContentRequest, OutputSchema, PromptSpec};
use crate::schema::{get_schema, ContentType, Tone};

/// Instruction used for every content type when emojis are turned off
pub const NO_EMOJI_INSTRUCTION: &str
  = "Do not use any emojis. Keep the text emoji-free.";

/// Appended to the tone line only for the Nigerian tone
pub const NIGERIAN_SLANG_CLAUSE: &str
  = "Feel free to use popular, positive slang like 'No wahala', 'Sabi', \
     or 'Naija-made'. Keep it authentic and not over-the-top.";

/// How the request values are laid out under their heading
#[derive(Debug, Clone, Copy)]
pub enum DetailsLayout
{   /// `*   **Label:** value` bullets, one per (field, label)
    Bullets(&'static [(&'static str, &'static str)])
  , /// The single field's value on its own line
    Block(&'static str)
}

/// Per-content-type wording plugged into the shared template
#[derive(Debug, Clone, Copy)]
pub struct ContentProfile
{   pub role: &'static str
  , pub task: &'static str
  , /// Extra structural block shown before the details
    pub structure: Option<&'static str>
  , pub details_heading: &'static str
  , pub details: DetailsLayout
  , pub emoji_instruction: &'static str
  , /// Style bullets after the emoji line
    pub extra_guidelines: &'static [&'static str]
  , pub closing: Option<&'static str>
  , /// Plural noun used in the numbered-list instruction
    pub plural: &'static str
}

const INSTAGRAM_BIO: ContentProfile = ContentProfile
{   role: "You are a world-class social media copywriter specializing in \
           viral Instagram bios."
  , task: "Your task is to generate **3 unique Instagram bio options** based \
           on the details provided. Each bio must be under 150 characters."
  , structure: Some(
      "**Structure for each bio:**\n\
       1.  **Hook:** Start with an attention-grabbing line.\n\
       2.  **Value Proposition:** Clearly state what the business offers and \
       what makes it special.\n\
       3.  **Call to Action (CTA):** End with a clear instruction for the user."
    )
  , details_heading: "**Business Details:**"
  , details: DetailsLayout::Bullets(&[
      ("businessName", "Name")
    , ("businessDescription", "Description")
    , ("valueProposition", "Value Proposition")
    , ("callToAction", "Call to Action")
    ])
  , emoji_instruction: "Weave in relevant emojis to add personality and \
                        break up the text."
  , extra_guidelines: &[]
  , closing: None
  , plural: "bios"
};

const WHATSAPP_DESCRIPTION: ContentProfile = ContentProfile
{   role: "You are an expert in crafting WhatsApp business descriptions that \
           build trust and encourage engagement."
  , task: "Your task is to generate **3 unique WhatsApp description options** \
           for the business based on the details below. Each description \
           should be professional, welcoming, and emphasize trust and quick \
           response times."
  , structure: None
  , details_heading: "**Business Details:**"
  , details: DetailsLayout::Bullets(&[
      ("businessName", "Name")
    , ("industry", "Industry")
    ])
  , emoji_instruction: "Use emojis to appear friendly and approachable."
  , extra_guidelines: &[]
  , closing: Some(
      "The description should make customers feel confident about \
       contacting the business."
    )
  , plural: "descriptions"
};

const TAGLINE: ContentProfile = ContentProfile
{   role: "You are a world-class marketing expert specializing in creating \
           short, unforgettable taglines."
  , task: "Your task is to generate **3 unique tagline options** based on the \
           business description provided. Each tagline should be catchy, \
           memorable, and between 3-7 words."
  , structure: None
  , details_heading: "**Business Description:**"
  , details: DetailsLayout::Block("businessDescription")
  , emoji_instruction: "If it fits, you can add a single, powerful emoji at \
                        the end."
  , extra_guidelines: &[]
  , closing: Some("The tagline should perfectly encapsulate the business's essence.")
  , plural: "taglines"
};

const PRODUCT_DESCRIPTION: ContentProfile = ContentProfile
{   role: "You are a world-class e-commerce copywriter known for writing \
           product descriptions that sell."
  , task: "Your task is to generate **3 unique product description options** \
           based on the details provided."
  , structure: None
  , details_heading: "**Product Details:**"
  , details: DetailsLayout::Bullets(&[
      ("productName", "Name")
    , ("productFeatures", "Features/Description")
    ])
  , emoji_instruction: "Weave in relevant emojis to make the description \
                        more engaging."
  , extra_guidelines: &[]
  , closing: Some(
      "Focus on benefits over features. Paint a picture for the customer and \
       make them feel like they need this product."
    )
  , plural: "descriptions"
};

const TWITTER_POST: ContentProfile = ContentProfile
{   role: "You are a viral social media manager specializing in X (formerly \
           Twitter)."
  , task: "Your task is to generate **3 unique post options** based on the \
           topic provided. Each post must be under 280 characters and include \
           relevant hashtags."
  , structure: None
  , details_heading: "**Topic:**"
  , details: DetailsLayout::Block("topic")
  , emoji_instruction: "Use relevant emojis to increase engagement."
  , extra_guidelines: &[]
  , closing: Some(
      "The posts should be engaging, concise, and designed to capture \
       attention."
    )
  , plural: "posts"
};

const FACEBOOK_POST: ContentProfile = ContentProfile
{   role: "You are a viral social media expert specializing in engaging \
           Facebook content."
  , task: "Your task is to generate **3 unique post options** based on the \
           topic provided. The posts should be optimized for Facebook's \
           platform, encouraging comments, shares, and reactions."
  , structure: None
  , details_heading: "**Topic:**"
  , details: DetailsLayout::Block("topic")
  , emoji_instruction: "Use relevant emojis to add personality and visual \
                        appeal."
  , extra_guidelines: &[
      "**Structure:** Start with a strong hook, provide value or tell a \
       story, and end with a question or a clear call-to-action to spark \
       engagement."
    , "**Hashtags:** Include 3-5 relevant hashtags at the end."
    ]
  , closing: None
  , plural: "posts"
};

/// Wording profile for a content type
pub fn profile(content_type: ContentType) -> &'static ContentProfile
{   match content_type
    {   ContentType::InstagramBio => &INSTAGRAM_BIO
      , ContentType::WhatsAppDescription => &WHATSAPP_DESCRIPTION
      , ContentType::Tagline => &TAGLINE
      , ContentType::ProductDescription => &PRODUCT_DESCRIPTION
      , ContentType::TwitterPost => &TWITTER_POST
      , ContentType::FacebookPost => &FACEBOOK_POST
    }
}

/// The `**Tone:**` bullet, with the slang clause for the Nigerian tone
pub fn tone_line(tone: Tone) -> String
{   let mut line = format!(
      "*   **Tone:** Your tone should be: **{}**.",
      tone
    );
    if tone == Tone::Nigerian
    {   line.push(' ');
        line.push_str(NIGERIAN_SLANG_CLAUSE);
    }
    line
}

/// The `**Emojis:**` bullet for either branch of the toggle
pub fn emoji_line(profile: &ContentProfile, include_emojis: bool) -> String
{   let instruction = if include_emojis
    {   profile.emoji_instruction
    } else
    {   NO_EMOJI_INSTRUCTION
    };
    format!("*   **Emojis:** {}", instruction)
}

/// Render a validated request into prompt text and output schema.
///
/// Pure and deterministic: the same request always yields byte-identical
/// text. Validation must already have happened; this never fails.
pub fn build_prompt(request: &ContentRequest) -> PromptSpec
{   let content_type = request.content_type();
    let profile = profile(content_type);
    let schema = get_schema(content_type);

    // Writing into a String cannot fail.
    let mut text = String::new();
    let _ = writeln!(text, "{}\n", profile.role);
    let _ = writeln!(text, "{}\n", profile.task);

    if let Some(structure) = profile.structure
    {   let _ = writeln!(text, "{}\n", structure);
    }

    let _ = writeln!(text, "{}", profile.details_heading);
    match profile.details
    {   DetailsLayout::Bullets(rows) => {
          for (field, label) in rows
          {   let value = request.fields.value(field).unwrap_or("");
              let _ = writeln!(text, "*   **{}:** {}", label, value);
          }
        }
      , DetailsLayout::Block(field) => {
          let _ = writeln!(text, "{}", request.fields.value(field).unwrap_or(""));
        }
    }
    text.push('\n');

    text.push_str("**Style Guidelines:**\n");
    let _ = writeln!(text, "{}", tone_line(request.tone));
    let _ = writeln!(text, "{}", emoji_line(profile, request.include_emojis));
    for guideline in profile.extra_guidelines
    {   let _ = writeln!(text, "*   {}", guideline);
    }
    text.push('\n');

    if let Some(closing) = profile.closing
    {   let _ = writeln!(text, "{}\n", closing);
    }

    let _ = writeln!(
      text,
      "Format your response as a single block of text. Present the 3 {} \
       as a numbered list, separated by a blank line.",
      profile.plural
    );

    trace!("Built {} prompt ({} bytes)", content_type.id(), text.len());

    PromptSpec
    {   content_type
      , text
      , output: OutputSchema
        {   field: schema.output_field.to_string()
          , description: schema.output_description.to_string()
        }
    }
}
