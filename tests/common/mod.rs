//! Common test utilities for media-batch-dl integration tests

#![allow(dead_code)]

use media_batch_dl::YtDlpFetcher;
use std::path::{Path, PathBuf};

/// Shell script standing in for yt-dlp
///
/// It reads `-o`, `--extract-audio` and the URL after `--`, writes one file following
/// the output template and prints the marker lines yt-dlp would print. URLs containing
/// `fail` exit 1 with an `ERROR:` line; URLs containing `silent` write the file but
/// report nothing. Every invocation writes its argument list to `args.<pid>.log` in a
/// directory next to the script.
const FAKE_YTDLP: &str = r#"
printf '%s\n' "$@" > "__ARGS_DIR__/args.$$.log"

out=""
url=""
audio=0
while [ $# -gt 0 ]; do
    case "$1" in
        -o) out="$2"; shift 2; continue ;;
        --extract-audio) audio=1 ;;
        --) url="$2"; break ;;
    esac
    shift
done

case "$url" in
    *fail*)
        echo "[generic] Extracting URL: $url" >&2
        echo "ERROR: [generic] Unsupported URL: $url" >&2
        exit 1
        ;;
esac

ext=mp4
if [ "$audio" = 1 ]; then ext=mp3; fi
path=$(printf '%s' "$out" | sed -e "s/%(title)s/Fake Title/" -e "s/%(ext)s/$ext/")

echo "mbdl-name $path"
echo "[download] 100% of 1.00MiB"
printf 'media for %s\n' "$url" > "$path"

case "$url" in
    *silent*) exit 0 ;;
esac
echo "mbdl-file $path"
"#;

/// A fake yt-dlp installed in `dir`
pub struct FakeYtDlp {
    pub fetcher: YtDlpFetcher,
    pub args_dir: PathBuf,
}

impl FakeYtDlp {
    /// Write the script into `dir` and build a fetcher running it through `sh`
    pub fn install(dir: &Path) -> Self {
        let script = dir.join("fake-yt-dlp.sh");
        let args_dir = dir.join("fake-yt-dlp-args");
        std::fs::create_dir_all(&args_dir).unwrap();
        let body = FAKE_YTDLP.replace("__ARGS_DIR__", &args_dir.to_string_lossy());
        std::fs::write(&script, body).unwrap();

        let fetcher = YtDlpFetcher::new(PathBuf::from("sh")).with_leading_args([script]);
        Self { fetcher, args_dir }
    }

    /// Argument lists of every invocation so far, in no particular order
    pub fn invocations(&self) -> Vec<Vec<String>> {
        std::fs::read_dir(&self.args_dir)
            .unwrap()
            .map(|entry| {
                let text = std::fs::read_to_string(entry.unwrap().path()).unwrap();
                text.lines().map(str::to_string).collect()
            })
            .collect()
    }
}

/// Value following `flag` in an argument list
pub fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}
