//! Static command catalog shown by the menu.
//!
//! Purely descriptive: none of these entries are handled by the dispatcher.

/// `(category, commands)` in display order.
pub(super) const CATALOG: &[(&str, &[&str])] = &[
    (
        "AI",
        &[
            "analyze", "blackbox", "code", "dalle", "deepseek", "doppleai", "gemini", "generate",
            "gpt", "gpt2", "imagen", "imagine", "llama", "metaai", "mistral", "programming",
            "recipe", "story", "summarize", "teach", "translate2",
        ],
    ),
    (
        "AUDIO",
        &[
            "bass", "blown", "deep", "earrape", "reverse", "robot", "tomp3", "toptt", "volaudio",
        ],
    ),
    (
        "DOWNLOAD",
        &[
            "apk", "download", "facebook", "gdrive", "gitclone", "image", "instagram", "itunes",
            "mediafire", "pin", "savestatus", "song", "song2", "telesticker", "tiktok",
            "tiktokaudio", "twitter", "video", "videodoc", "xvideos",
        ],
    ),
    (
        "EPHOTO360",
        &[
            "1917style", "advancedglow", "blackpinklogo", "blackpinkstyle", "cartoonstyle",
            "deletingtext", "dragonball", "effectclouds", "flag3dtext", "flagtext", "freecreate",
            "galaxystyle", "galaxywallpaper", "glitchtext", "glowingtext", "gradienttext",
            "graffiti", "incandescent", "lighteffects", "logomaker", "luxurygold", "makingneon",
            "matrix", "multicoloredneon", "neonglitch", "papercutstyle", "pixelglitch",
            "royaltext", "sand", "summerbeach", "topography", "typography", "watercolortext",
            "writetext",
        ],
    ),
    (
        "FUN",
        &[
            "fact", "jokes", "memes", "quotes", "trivia", "truthdetector", "xxqc",
        ],
    ),
    (
        "GAMES",
        &[
            "dare", "truth", "truthordare",
        ],
    ),
    (
        "GROUP",
        &[
            "add", "addcode", "allow", "announcements", "antibadword", "antibot", "antidemote",
            "antiforeign", "antigroupmention", "antilink", "antilinkgc", "antisticker", "antitag",
            "antitagadmin", "approve", "approveall", "cancelkick", "close", "closetime",
            "delallowed", "delcode", "delppgroup", "demote", "disapproveall", "editsettings",
            "getgrouppp", "hidetag", "invite", "kick", "kickall", "kickinactive", "link",
            "listactive", "listallowed", "listcode", "listinactive", "listrequests", "mediatag",
            "open", "opentime", "poll", "promote", "reject", "resetlink", "setdesc",
            "setgroupname", "setppgroup", "tag", "tagadmin", "tagall", "tosgroup", "totalmembers",
            "userid", "vcf", "welcome",
        ],
    ),
    (
        "IMAGE",
        &[
            "remini", "wallpaper",
        ],
    ),
    (
        "OTHER",
        &[
            "botstatus", "pair", "ping", "ping2", "repo", "runtime", "time",
        ],
    ),
    (
        "OWNER",
        &[
            "autosavestatus", "aza", "block", "delete", "deljunk", "delstickercmd", "disk", "dlvo",
            "gcaddprivacy", "groupid", "hostip", "join", "lastseen", "leave", "listbadword",
            "listblocked", "listignorelist", "listsudo", "modestatus", "online", "owner",
            "ppprivacy", "react", "readreceipts", "resetaza", "restart", "setaza", "setbio",
            "setprofilepic", "setstickercmd", "tostatus", "toviewonce", "unblock", "unblockall",
            "update", "vv2", "warn",
        ],
    ),
    (
        "RELIGION",
        &[
            "bible", "quran",
        ],
    ),
    (
        "SEARCH",
        &[
            "define", "define2", "imdb", "lyrics", "shazam", "weather", "yts",
        ],
    ),
    (
        "SETTINGS",
        &[
            "addbadword", "addcountrycode", "addignorelist", "addsudo", "alwaysonline", "antibug",
            "anticall", "antidelete", "antideletestatus", "antiedit", "antiviewonce", "autobio",
            "autoblock", "autoreact", "autoreactstatus", "autoread", "autorecord",
            "autorecordtyping", "autotype", "autoviewstatus", "chatbot", "delanticallmsg",
            "delcountrycode", "deletebadword", "delgoodbye", "delignorelist", "delsudo",
            "delwelcome", "getsettings", "listcountrycode", "listwarn", "mode", "resetsetting",
            "resetwarn", "setanticallmsg", "setbotname", "setcontextlink", "setfont", "setgoodbye",
            "setmenu", "setmenuimage", "setownername", "setownernumber", "setprefix",
            "setstatusemoji", "setstickerauthor", "setstickerpackname", "settimezone", "setwarn",
            "setwatermark", "setwelcome", "showanticallmsg", "showgoodbye", "showwelcome",
            "testanticallmsg", "testgoodbye", "testwelcome",
        ],
    ),
    (
        "SPORTS",
        &[
            "bundesligamatches", "bundesligascorers", "bundesligastandings", "bundesligaupcoming",
            "clmatches", "clscorers", "clstandings", "clupcoming", "eflmatches", "eflscorers",
            "eflstandings", "eflupcoming", "elmatches", "elscorers", "elstandings", "elupcoming",
            "eplmatches", "eplscorers", "eplstandings", "eplupcoming", "laligamatches",
            "laligascorers", "laligastandings", "laligaupcoming", "ligue1matches", "ligue1scorers",
            "ligue1standings", "ligue1upcoming", "serieamatches", "serieascorers",
            "serieastandings", "serieaupcoming", "wcmatches", "wcscorers", "wcstandings",
            "wcupcoming", "wrestlingevents", "wwenews", "wweschedule",
        ],
    ),
    (
        "SUPPORT",
        &[
            "feedback", "helpers",
        ],
    ),
    (
        "TOOLS",
        &[
            "browse", "calculate", "device", "emojimix", "fancy", "filtervcf", "fliptext",
            "genpass", "getabout", "getpp", "gsmarena", "obfuscate", "qrcode", "runeval", "say",
            "ssweb", "sswebpc", "sswebtab", "sticker", "take", "texttopdf", "tinyurl", "toimage",
            "tourl", "vcc",
        ],
    ),
    (
        "TRANSLATE",
        &[
            "translate",
        ],
    ),
    (
        "VIDEO",
        &[
            "toaudio", "tovideo", "volvideo",
        ],
    ),
];

/// Number of catalog entries across all categories.
pub(super) fn entry_count() -> usize {
    CATALOG.iter().map(|(_, commands)| commands.len()).sum()
}

/// Render every category as a framed section, separated by blank lines.
pub(super) fn render() -> String {
    CATALOG
        .iter()
        .map(|(category, commands)| {
            let mut section = format!("┏▣ ◈ *{category} MENU* ◈\n");
            for command in *commands {
                section.push_str("│➽ ");
                section.push_str(command);
                section.push('\n');
            }
            section.push_str("┗▣");
            section
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
