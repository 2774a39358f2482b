mod remote_audio;

pub use remote_audio::{guess_extension, url_basename, FetchError, RemoteAudioFetcher};
