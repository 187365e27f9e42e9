use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Ask for the image directory. A blank answer selects the current directory.
pub fn prompt_directory() -> io::Result<PathBuf> {
    println!("Enter the directory containing your images.");
    println!("Tip: drag and drop the folder here, or press Enter for the current directory.");
    print!("Directory path: ");
    io::stdout().flush()?;

    read_directory(&mut io::stdin().lock())
}

/// A closed input stream is an error, never the current directory.
fn read_directory(reader: &mut impl BufRead) -> io::Result<PathBuf> {
    let line = read_answer(reader)?.ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, "no directory given on input")
    })?;
    resolve_directory_input(&line)
}

pub fn resolve_directory_input(input: &str) -> io::Result<PathBuf> {
    let cleaned = clean_directory_input(input);
    if cleaned.is_empty() {
        env::current_dir()
    } else {
        Ok(PathBuf::from(cleaned))
    }
}

/// Trim whitespace and the quotes Explorer adds on drag and drop.
pub fn clean_directory_input(input: &str) -> &str {
    input.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Yes/no question on stdin. Closed input answers no.
pub fn prompt_confirm(prompt: &str, default: Option<bool>) -> io::Result<bool> {
    let hint = if default == Some(true) { "Y/n" } else { "y/N" };
    let ask = || {
        print!("{} ({}): ", prompt, hint);
        io::stdout().flush()
    };
    confirm_from(&mut io::stdin().lock(), ask, default)
}

fn confirm_from(
    reader: &mut impl BufRead,
    mut ask: impl FnMut() -> io::Result<()>,
    default: Option<bool>,
) -> io::Result<bool> {
    loop {
        ask()?;
        let Some(answer) = read_answer(reader)? else {
            return Ok(false);
        };
        match parse_answer(&answer).or(default.filter(|_| answer.trim().is_empty())) {
            Some(choice) => return Ok(choice),
            None => continue,
        }
    }
}

fn parse_answer(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

// `None` once the stream is exhausted.
fn read_answer(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    match reader.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn confirm(input: &str, default: Option<bool>) -> bool {
        confirm_from(&mut Cursor::new(input), || Ok(()), default).unwrap()
    }

    #[test]
    fn test_closed_input_is_not_a_directory() {
        let err = read_directory(&mut Cursor::new("")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_directory_from_input() {
        assert_eq!(
            read_directory(&mut Cursor::new("\n")).unwrap(),
            env::current_dir().unwrap()
        );
        assert_eq!(
            read_directory(&mut Cursor::new("\"/srv/images\"\r\n")).unwrap(),
            PathBuf::from("/srv/images")
        );
    }

    #[test]
    fn test_closed_input_declines_even_with_yes_default() {
        assert!(!confirm("", Some(true)));
        assert!(!confirm("", None));
    }

    #[test]
    fn test_confirm_answers() {
        assert!(confirm("y\n", Some(false)));
        assert!(confirm("YES\n", None));
        assert!(!confirm("n\n", Some(true)));
        assert!(confirm("\n", Some(true)));
        assert!(!confirm("\n", Some(false)));
    }

    #[test]
    fn test_confirm_asks_again_until_answered() {
        let mut asked = 0;
        let answer = confirm_from(
            &mut Cursor::new("maybe\n\ny\n"),
            || {
                asked += 1;
                Ok(())
            },
            None,
        )
        .unwrap();
        assert!(answer);
        assert_eq!(asked, 3);
    }

    #[test]
    fn test_clean_strips_quotes_and_whitespace() {
        assert_eq!(
            clean_directory_input("  \"C:\\Users\\me\\Pictures\"  \r\n"),
            "C:\\Users\\me\\Pictures"
        );
        assert_eq!(clean_directory_input("'/home/me/icons'\n"), "/home/me/icons");
        assert_eq!(clean_directory_input("/plain/path"), "/plain/path");
    }

    #[test]
    fn test_blank_input_is_current_directory() {
        assert_eq!(
            resolve_directory_input("   \n").unwrap(),
            env::current_dir().unwrap()
        );
        assert_eq!(
            resolve_directory_input("\"\"").unwrap(),
            env::current_dir().unwrap()
        );
    }

    #[test]
    fn test_non_blank_input_is_used_as_is() {
        assert_eq!(
            resolve_directory_input("\"/srv/images\"").unwrap(),
            PathBuf::from("/srv/images")
        );
    }
}
