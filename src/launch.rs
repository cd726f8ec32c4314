use std::path::PathBuf;

pub fn parse_initial_folder_from_args(args: &[String]) -> Result<Option<PathBuf>, String> {
    let paths = match args.first().map(String::as_str) {
        None => return Ok(None),
        Some("--open") => {
            if args.len() == 1 {
                return Err("Missing folder path after --open.".to_string());
            }
            &args[1..]
        }
        Some(flag) if flag.starts_with("--") => {
            return Err(format!("Unknown option {flag}."));
        }
        Some(_) => args,
    };

    match paths {
        [folder] => Ok(Some(PathBuf::from(folder))),
        other => Err(format!(
            "Expected a single folder to open (got {}).",
            other.len()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_args_opens_nothing() {
        assert_eq!(parse_initial_folder_from_args(&[]), Ok(None));
    }

    #[test]
    fn parse_bare_folder() {
        let parsed =
            parse_initial_folder_from_args(&args(&["samples"])).expect("args should parse");
        assert_eq!(parsed, Some(PathBuf::from("samples")));
    }

    #[test]
    fn parse_open_flag() {
        let parsed = parse_initial_folder_from_args(&args(&["--open", "output/samples"]))
            .expect("args should parse");
        assert_eq!(parsed, Some(PathBuf::from("output/samples")));
    }

    #[test]
    fn open_flag_requires_folder() {
        let err = parse_initial_folder_from_args(&args(&["--open"]))
            .expect_err("missing folder should fail");
        assert!(err.contains("--open"));
    }

    #[test]
    fn rejects_multiple_folders_and_unknown_flags() {
        assert!(parse_initial_folder_from_args(&args(&["a", "b"])).is_err());
        assert!(parse_initial_folder_from_args(&args(&["--open", "a", "b"])).is_err());
        assert!(parse_initial_folder_from_args(&args(&["--recursive", "a"])).is_err());
    }
}
