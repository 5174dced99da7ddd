use std::collections::{HashMap, HashSet, VecDeque};

use crate::constant::*;
use crate::matcher::model::*;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Classifies raw tokens, single pass, left to right.
///
/// Every token fed either completes one or more [`Match`]es, opens a buffer awaiting the option's value, or fails.
/// The caller drains completed matches after each feed so that conversion errors surface in input order.
#[derive(Debug)]
pub(crate) struct TokenMatcher {
    long_options: HashMap<String, (String, bool)>,
    negations: HashMap<String, String>,
    short_options: HashMap<char, (String, bool)>,
    arguments: Vec<ArgumentConfig>,
    sub_commands: HashSet<String>,
    help_long: bool,
    help_short: bool,
    terminated: bool,
    filled: usize,
    buffer: Option<MatchBuffer>,
    matches: VecDeque<Match>,
}

impl TokenMatcher {
    pub(crate) fn new(
        options: Vec<OptionConfig>,
        arguments: Vec<ArgumentConfig>,
        sub_commands: HashSet<String>,
        help: bool,
    ) -> Self {
        let mut long_options = HashMap::default();
        let mut negations = HashMap::default();
        let mut short_options = HashMap::default();

        for option_config in options.into_iter() {
            if let Some(long) = option_config.long() {
                long_options.insert(
                    long.clone(),
                    (option_config.name().to_string(), option_config.takes_value()),
                );

                if option_config.negatable() {
                    negations.insert(
                        format!("{NEGATION_PREFIX}{long}"),
                        option_config.name().to_string(),
                    );
                }
            }

            if let Some(short) = option_config.short() {
                short_options.insert(
                    *short,
                    (option_config.name().to_string(), option_config.takes_value()),
                );
            }
        }

        let help_long = help && !long_options.contains_key(HELP_NAME);
        let help_short = help && !short_options.contains_key(&HELP_SHORT);

        Self {
            long_options,
            negations,
            short_options,
            arguments,
            sub_commands,
            help_long,
            help_short,
            terminated: false,
            filled: 0,
            buffer: None,
            matches: VecDeque::default(),
        }
    }

    pub(crate) fn feed(&mut self, token: &str) -> Result<(), MatchError> {
        #[cfg(feature = "tracing_debug")]
        debug!("Feeding token '{token}' (terminated={}).", self.terminated);

        // An option awaiting its value takes the next token whole, whatever it looks like.
        if let Some(match_buffer) = self.buffer.take() {
            self.matches.push_back(match_buffer.close(token));
            return Ok(());
        }

        // 1. After the terminator, everything is positional.
        if self.terminated {
            return self.match_argument(token);
        }

        // 2. The terminator itself.
        if token == TERMINATOR {
            self.terminated = true;
            return Ok(());
        }

        if self.is_help(token) {
            self.matches.push_back(Match::Help);
            return Ok(());
        }

        // 3/4. Find a 'long' option, such as:
        //  --initial
        //  --initial ..
        //  --initial=..
        //  --no-initial
        // 5/6. Find 'short' option(s), such as (both -i and -v are example short options):
        //  -i
        //  -i ..
        //  -vi ..
        // 7. Match against a positional or sub-command.
        if let Some(long) = token.strip_prefix("--") {
            self.match_option(split_equals_delimiter(long))
        } else if let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) {
            self.match_option_short(cluster)
        } else {
            self.match_argument(token)
        }
    }

    /// Take the matches completed so far, in input order.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = Match> + '_ {
        self.matches.drain(..)
    }

    /// Finish matching; fails if an option is still waiting on its value.
    pub(crate) fn close(&mut self) -> Result<(), MatchError> {
        match self.buffer.take() {
            Some(match_buffer) => Err(match_buffer.abandon()),
            None => Ok(()),
        }
    }

    fn is_help(&self, token: &str) -> bool {
        (self.help_long && token == format!("--{HELP_NAME}"))
            || (self.help_short && token == format!("-{HELP_SHORT}"))
    }

    fn arguments_satisfied(&self) -> bool {
        self.arguments
            .iter()
            .skip(self.filled)
            .all(ArgumentConfig::satisfied)
    }

    fn match_argument(&mut self, token: &str) -> Result<(), MatchError> {
        // Sub-commands are only recognized once the required positionals are satisfied.
        if !self.terminated && self.sub_commands.contains(token) && self.arguments_satisfied() {
            #[cfg(feature = "tracing_debug")]
            debug!("Token '{token}' selects the sub-command.");
            self.matches.push_back(Match::SubCommand {
                name: token.to_string(),
            });
            return Ok(());
        }

        if self.filled < self.arguments.len() {
            self.matches.push_back(Match::Argument {
                index: self.filled,
                value: token.to_string(),
            });
            self.filled += 1;
            Ok(())
        } else if !self.terminated && !self.sub_commands.is_empty() {
            Err(MatchError::UnknownSubCommand(token.to_string()))
        } else {
            Err(MatchError::ArgumentsExhausted(token.to_string()))
        }
    }

    fn match_option(
        &mut self,
        (option_name, single_argument): (&str, Option<&str>),
    ) -> Result<(), MatchError> {
        if let Some((name, takes_value)) = self.long_options.get(option_name) {
            let specifier = Specifier::Long(option_name.to_string());

            match (takes_value, single_argument) {
                (true, Some(value)) => {
                    self.matches.push_back(Match::Option {
                        name: name.clone(),
                        specifier,
                        value: Some(value.to_string()),
                        negated: false,
                    });
                }
                (true, None) => {
                    self.buffer.replace(MatchBuffer::new(name.clone(), specifier));
                }
                (false, None) => {
                    self.matches.push_back(Match::Option {
                        name: name.clone(),
                        specifier,
                        value: None,
                        negated: false,
                    });
                }
                (false, Some(_)) => {
                    return Err(MatchError::UnexpectedValueLong(option_name.to_string()));
                }
            };

            Ok(())
        } else if let Some(name) = self.negations.get(option_name) {
            if single_argument.is_some() {
                return Err(MatchError::UnexpectedValueLong(option_name.to_string()));
            }

            self.matches.push_back(Match::Option {
                name: name.clone(),
                specifier: Specifier::Long(option_name.to_string()),
                value: None,
                negated: true,
            });
            Ok(())
        } else {
            Err(MatchError::UnknownLong(option_name.to_string()))
        }
    }

    fn match_option_short(&mut self, cluster: &str) -> Result<(), MatchError> {
        if let Some((head, _)) = cluster.split_once('=') {
            return Err(MatchError::ShortWithEquals(format!("-{head}")));
        }

        let length = cluster.chars().count();

        for (index, single) in cluster.chars().enumerate() {
            match self.short_options.get(&single) {
                Some((name, true)) => {
                    // Only the final character of the cluster may take a value.
                    if index + 1 == length {
                        self.buffer
                            .replace(MatchBuffer::new(name.clone(), Specifier::Short(single)));
                    } else {
                        return Err(MatchError::ShortClusterNoBool {
                            short: single,
                            cluster: cluster.to_string(),
                        });
                    }
                }
                Some((name, false)) => {
                    self.matches.push_back(Match::Option {
                        name: name.clone(),
                        specifier: Specifier::Short(single),
                        value: None,
                        negated: false,
                    });
                }
                None => {
                    return Err(if length == 1 {
                        MatchError::UnknownShort(single)
                    } else {
                        MatchError::UnknownShortInCluster {
                            short: single,
                            cluster: cluster.to_string(),
                        }
                    });
                }
            }
        }

        Ok(())
    }
}

fn split_equals_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((n, v)) => (n, Some(v)),
        None => (token, None),
    }
}
