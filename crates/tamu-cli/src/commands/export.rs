// Export command - download an event's attendance CSV

use anyhow::Result;

use crate::client::Client;

pub async fn run(
    client: &Client,
    quiet: bool,
    event_id: i64,
    out_file: Option<String>,
    institution: Option<String>,
) -> Result<()> {
    let mut path = format!("/v1/attendance/event/{event_id}/export");
    if let Some(institution) = institution {
        path.push_str(&format!("?institution={}", urlencode(&institution)));
    }

    let csv = client.get_text(&path).await?;

    match out_file {
        Some(file) => {
            let lines = csv.lines().count().saturating_sub(1);
            std::fs::write(&file, &csv)?;
            if !quiet {
                eprintln!("Wrote {lines} records to {file}");
            }
        }
        None => println!("{csv}"),
    }

    Ok(())
}

/// Minimal percent-encoding for a query value.
fn urlencode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_escapes_spaces_and_unicode() {
        assert_eq!(urlencode("Universitas Dumai"), "Universitas%20Dumai");
        assert_eq!(urlencode("a-b_c.d~e"), "a-b_c.d~e");
    }
}
