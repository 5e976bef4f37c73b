// fragments.rs
use crate::scraper::site::ScriptMarkers;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentSource {
    Details,
    SharedBlock,
    Images,
    Floorplans,
}

impl fmt::Display for FragmentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FragmentSource::Details => "details",
            FragmentSource::SharedBlock => "shared_block",
            FragmentSource::Images => "images",
            FragmentSource::Floorplans => "floorplans",
        };
        f.write_str(name)
    }
}

/// A slice of inline script, cleaned and ready for the JS parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub source: FragmentSource,
    pub text: String,
}

/// Trims the script and flattens the whitespace the parser chokes on.
/// Newlines stay so line comments still end and semicolons can be elided.
pub fn clean(script: &str) -> String {
    script.trim().replace('\r', "").replace('\t', " ")
}

/// Pulls the parsable fragments out of a page's script bodies, in the order
/// they are walked: details, shared block, images, floor plans.
///
/// A marker that matches nothing contributes nothing.
pub fn isolate(scripts: &[String], markers: &ScriptMarkers) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = scripts
        .iter()
        .filter(|s| s.contains(&markers.details))
        .map(|s| Fragment {
            source: FragmentSource::Details,
            text: clean(s),
        })
        .collect();

    if let Some(script) = first_containing(scripts, &markers.shared_block) {
        if let Some(section) = script
            .split(markers.delimiter.as_str())
            .nth(markers.shared_block_section)
        {
            fragments.push(Fragment {
                source: FragmentSource::SharedBlock,
                text: clean(section),
            });
        }
    }

    for (source, marker) in [
        (FragmentSource::Images, &markers.images),
        (FragmentSource::Floorplans, &markers.floorplans),
    ] {
        if let Some(script) = first_containing(scripts, marker) {
            fragments.extend(
                script
                    .split(markers.delimiter.as_str())
                    .filter(|piece| piece.contains(marker.as_str()))
                    .map(|piece| Fragment {
                        source,
                        text: clean(piece),
                    }),
            );
        }
    }

    fragments
}

fn first_containing<'a>(scripts: &'a [String], marker: &str) -> Option<&'a String> {
    scripts.iter().find(|s| s.contains(marker))
}
