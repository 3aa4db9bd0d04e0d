use crate::types::{BODY_PARTS, DIRECTIONS, MODALITIES, PROTOCOLS, UNKNOWN};

/// MIME type of the image embedded in the prompt
pub const IMAGE_MIME: &str = "image/jpeg";

fn quoted_options(options: &[&str]) -> String {
    options
        .iter()
        .chain(std::iter::once(&UNKNOWN))
        .map(|o| format!("\"{}\"", o))
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Builds the classification prompt around a base64 JPEG
///
/// Lists the four fields with their allowed values, asks for a JSON object
/// with exactly those keys, and embeds the image as a data URI.
pub fn build_prompt(encoded_image: &str) -> String {
    format!(
        "Given the following base64 encoded medical image, determine the following details:\n\
         1. Modality ({modalities})\n\
         2. Body Part ({body_parts})\n\
         3. Protocol ({protocols})\n\
         4. Direction ({directions})\n\
         \n\
         Use \"{unknown}\" for any field you cannot determine from the image.\n\
         Please provide the result as a JSON object with exactly these four keys \
         and no others, in the following format:\n\
         ```json\n\
         {{\n  \
           \"modality\": \"CT\",\n  \
           \"body_part\": \"Head\",\n  \
           \"protocol\": \"Contrast Enhanced\",\n  \
           \"direction\": \"Axial\"\n\
         }}\n\
         ```\n\
         - \"modality\" is the imaging technique, based on visual inspection.\n\
         - \"body_part\" is the anatomical region, based on anatomical landmarks.\n\
         - \"protocol\" depends on the presence or absence of a contrast agent.\n\
         - \"direction\" is the orientation of the image.\n\
         \n\
         Base64 Image:\n\
         data:{mime};base64,{image}\n",
        modalities = quoted_options(&MODALITIES),
        body_parts = quoted_options(&BODY_PARTS),
        protocols = quoted_options(&PROTOCOLS),
        directions = quoted_options(&DIRECTIONS),
        unknown = UNKNOWN,
        mime = IMAGE_MIME,
        image = encoded_image,
    )
}
